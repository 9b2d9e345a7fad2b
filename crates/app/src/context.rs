//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::{
    database::{self, Db},
    domain::{
        access_codes::{AccessCodesService, PgAccessCodesService},
        documents::{DocumentsService, PgDocumentsService},
        push_tokens::{PgPushTokensService, PushTokensService},
        reports::{PgReportsService, ReportsService},
    },
    integrations::{
        dispatcher::SyncDispatcher,
        drive::DriveClient,
        mail::{MailClient, MailConfig},
        oauth::{GoogleAuthenticator, GoogleOAuthConfig},
        push::ExpoPushClient,
        sheets::SheetsClient,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Everything the app needs beyond the database URL. Missing integration
/// settings disable the matching sync step rather than failing startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub database_url: String,
    pub google_oauth: Option<GoogleOAuthConfig>,
    pub drive_root_folder_id: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub mail: Option<MailConfig>,
}

#[derive(Clone)]
pub struct AppContext {
    pub access_codes: Arc<dyn AccessCodesService>,
    pub push_tokens: Arc<dyn PushTokensService>,
    pub documents: Arc<dyn DocumentsService>,
    pub reports: Arc<dyn ReportsService>,
    pub mail: Option<Arc<MailClient>>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let authenticator = config.google_oauth.map(GoogleAuthenticator::new).map(Arc::new);

        if authenticator.is_none() {
            warn!("google oauth credentials not configured; drive and sheets sync disabled");
        }

        let drive = match (&authenticator, config.drive_root_folder_id) {
            (Some(auth), Some(root)) => Some(DriveClient::new(Arc::clone(auth), root)),
            (None, Some(_)) => None,
            (_, None) => {
                warn!("drive root folder not configured; photo upload disabled");

                None
            }
        };

        let sheets = match (&authenticator, config.spreadsheet_id) {
            (Some(auth), Some(spreadsheet)) => {
                Some(SheetsClient::new(Arc::clone(auth), spreadsheet))
            }
            (None, Some(_)) => None,
            (_, None) => {
                warn!("spreadsheet not configured; registration log disabled");

                None
            }
        };

        let sync = SyncDispatcher::new(db.clone(), drive, sheets, Some(ExpoPushClient::new()));

        Ok(Self {
            access_codes: Arc::new(PgAccessCodesService::new(db.clone(), sync.clone())),
            push_tokens: Arc::new(PgPushTokensService::new(db.clone())),
            documents: Arc::new(PgDocumentsService::new(db.clone(), sync)),
            reports: Arc::new(PgReportsService::new(db)),
            mail: config.mail.map(MailClient::new).map(Arc::new),
        })
    }
}
