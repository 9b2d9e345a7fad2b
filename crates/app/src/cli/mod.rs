use clap::{Parser, Subcommand};

mod codes;
mod db;
mod report;

#[derive(Debug, Parser)]
#[command(name = "aldaba-app", about = "Aldaba operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Codes(codes::CodesCommand),
    Db(db::DbCommand),
    Report(report::ReportCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Codes(command) => codes::run(command).await,
            Commands::Db(command) => db::run(command).await,
            Commands::Report(command) => report::run(command).await,
        }
    }
}
