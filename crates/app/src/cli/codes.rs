use clap::{Args, Subcommand};

use aldaba_app::context::{AppConfig, AppContext};

#[derive(Debug, Args)]
pub(crate) struct CodesCommand {
    #[command(subcommand)]
    command: CodesSubcommand,
}

#[derive(Debug, Subcommand)]
enum CodesSubcommand {
    /// Delete every QR code belonging to a condominium.
    Reset(ResetArgs),
}

#[derive(Debug, Args)]
struct ResetArgs {
    /// Condominium whose codes are wiped
    #[arg(long)]
    condominium: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(command: CodesCommand) -> Result<(), String> {
    match command.command {
        CodesSubcommand::Reset(args) => {
            let app = AppContext::from_config(AppConfig {
                database_url: args.database_url,
                ..AppConfig::default()
            })
            .await
            .map_err(|e| format!("failed to initialize app context: {e}"))?;

            let removed = app
                .access_codes
                .reset(&args.condominium)
                .await
                .map_err(|e| format!("failed to reset codes: {e}"))?;

            println!("removed {removed} codes for {}", args.condominium);

            Ok(())
        }
    }
}
