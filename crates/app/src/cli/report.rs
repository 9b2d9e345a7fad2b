use clap::{Args, Subcommand};

use aldaba_app::{
    context::{AppConfig, AppContext},
    domain::reports::scheduler,
    integrations::mail::MailConfig,
};

#[derive(Debug, Args)]
pub(crate) struct ReportCommand {
    #[command(subcommand)]
    command: ReportSubcommand,
}

#[derive(Debug, Subcommand)]
enum ReportSubcommand {
    /// Compose today's activity report and mail it now.
    Send(SendArgs),
}

#[derive(Debug, Args)]
struct SendArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Transactional mail API endpoint
    #[arg(long, env = "MAIL_API_URL")]
    mail_api_url: String,

    /// Mail API key
    #[arg(long, env = "MAIL_API_KEY", hide_env_values = true)]
    mail_api_key: String,

    /// Sender address
    #[arg(long, env = "MAIL_FROM")]
    mail_from: String,

    /// Recipient addresses (comma separated)
    #[arg(long, env = "MAIL_TO", value_delimiter = ',')]
    mail_to: Vec<String>,
}

pub(crate) async fn run(command: ReportCommand) -> Result<(), String> {
    match command.command {
        ReportSubcommand::Send(args) => {
            let app = AppContext::from_config(AppConfig {
                database_url: args.database_url,
                mail: Some(MailConfig {
                    endpoint: args.mail_api_url,
                    api_key: args.mail_api_key,
                    sender: args.mail_from,
                    recipients: args.mail_to,
                }),
                ..AppConfig::default()
            })
            .await
            .map_err(|e| format!("failed to initialize app context: {e}"))?;

            let mail = app
                .mail
                .as_ref()
                .ok_or_else(|| "mail settings missing".to_string())?;

            scheduler::send_once(app.reports.as_ref(), mail)
                .await
                .map_err(|e| format!("failed to send report: {e}"))?;

            println!("report sent");

            Ok(())
        }
    }
}
