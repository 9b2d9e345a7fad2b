//! Periodic report delivery.

use std::{sync::Arc, time::Duration};

use aldaba::report;
use jiff::{Timestamp, tz::TimeZone};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{
    domain::reports::{errors::ReportsServiceError, service::ReportsService},
    integrations::mail::{MailClient, MailError},
};

/// Errors from composing or delivering one report.
#[derive(Debug, Error)]
pub enum ReportSendError {
    #[error(transparent)]
    Reports(#[from] ReportsServiceError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Spawn the periodic report loop.
pub fn spawn(
    reports: Arc<dyn ReportsService>,
    mail: Arc<MailClient>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);

        // The first tick fires immediately; reports wait one full period.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if let Err(send_error) = send_once(reports.as_ref(), &mail).await {
                error!("failed to send activity report: {send_error}");
            }
        }
    })
}

/// Compose and send one report covering the current UTC day.
///
/// # Errors
///
/// Returns an error when assembling the summaries or sending the mail fails.
pub async fn send_once(
    reports: &dyn ReportsService,
    mail: &MailClient,
) -> Result<(), ReportSendError> {
    let summaries = reports.daily_activity().await?;

    let label = Timestamp::now().to_zoned(TimeZone::UTC).date().to_string();
    let subject = format!("Reporte de accesos - {label}");
    let body = report::render(&label, &summaries);

    mail.send(&subject, &body).await?;

    info!(condominiums = summaries.len(), "activity report sent");

    Ok(())
}
