//! Server configuration module

use clap::Parser;

use aldaba_app::{
    auth::AdminToken,
    context::AppConfig,
    integrations::{mail::MailConfig, oauth::GoogleOAuthConfig},
};

/// Aldaba JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "aldaba-json", about = "Aldaba JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Public URL of this server, enables the keep-alive self-ping
    #[arg(long, env = "SERVER_URL")]
    pub server_url: Option<String>,

    /// Bearer token required by `/api/admin` routes
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Google OAuth client ID
    #[arg(long, env = "OAUTH_CLIENT_ID")]
    pub oauth_client_id: Option<String>,

    /// Google OAuth client secret
    #[arg(long, env = "OAUTH_CLIENT_SECRET", hide_env_values = true)]
    pub oauth_client_secret: Option<String>,

    /// Google OAuth refresh token
    #[arg(long, env = "OAUTH_REFRESH_TOKEN", hide_env_values = true)]
    pub oauth_refresh_token: Option<String>,

    /// Drive folder holding the per-condominium evidence tree
    #[arg(long, env = "DRIVE_FOLDER_ID")]
    pub drive_folder_id: Option<String>,

    /// Spreadsheet holding the per-condominium registration tabs
    #[arg(long, env = "SHEETS_SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Transactional mail API endpoint
    #[arg(long, env = "MAIL_API_URL")]
    pub mail_api_url: Option<String>,

    /// Mail API key
    #[arg(long, env = "MAIL_API_KEY", hide_env_values = true)]
    pub mail_api_key: Option<String>,

    /// Report sender address
    #[arg(long, env = "MAIL_FROM")]
    pub mail_from: Option<String>,

    /// Report recipient addresses (comma separated)
    #[arg(long, env = "MAIL_TO", value_delimiter = ',')]
    pub mail_to: Vec<String>,

    /// Hours between activity report emails
    #[arg(long, env = "REPORT_INTERVAL_HOURS", default_value = "24")]
    pub report_interval_hours: u64,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Admin credential for the guarded routes, when configured.
    #[must_use]
    pub fn admin_token(&self) -> Option<AdminToken> {
        self.admin_token.clone().map(AdminToken::new)
    }

    /// App-layer settings derived from this configuration.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        let google_oauth = match (
            self.oauth_client_id.clone(),
            self.oauth_client_secret.clone(),
            self.oauth_refresh_token.clone(),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Some(GoogleOAuthConfig {
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            _ => None,
        };

        let mail = match (
            self.mail_api_url.clone(),
            self.mail_api_key.clone(),
            self.mail_from.clone(),
        ) {
            (Some(endpoint), Some(api_key), Some(sender)) if !self.mail_to.is_empty() => {
                Some(MailConfig {
                    endpoint,
                    api_key,
                    sender,
                    recipients: self.mail_to.clone(),
                })
            }
            _ => None,
        };

        AppConfig {
            database_url: self.database_url.clone(),
            google_oauth,
            drive_root_folder_id: self.drive_folder_id.clone(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            mail,
        }
    }
}
