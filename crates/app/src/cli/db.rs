use clap::{Args, Subcommand};

use aldaba_app::database;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply the schema DDL (idempotent).
    Setup(SetupArgs),
}

#[derive(Debug, Args)]
struct SetupArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    match command.command {
        DbSubcommand::Setup(args) => {
            let pool = database::connect(&args.database_url)
                .await
                .map_err(|e| format!("failed to connect to database: {e}"))?;

            database::apply_schema(&pool)
                .await
                .map_err(|e| format!("failed to apply schema: {e}"))?;

            println!("schema applied");

            Ok(())
        }
    }
}
