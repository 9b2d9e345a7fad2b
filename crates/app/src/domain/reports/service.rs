//! Reports service.

use aldaba::{
    counters::{DailyCounters, utc_day_start},
    report::ActivitySummary,
};
use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::reports::{errors::ReportsServiceError, repository::PgReportsRepository},
};

const RECENT_CODES_PER_CONDOMINIUM: i64 = 10;

#[derive(Debug, Clone)]
pub struct PgReportsService {
    db: Db,
    repository: PgReportsRepository,
}

impl PgReportsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReportsRepository::new(),
        }
    }
}

#[async_trait]
impl ReportsService for PgReportsService {
    async fn daily_activity(&self) -> Result<Vec<ActivitySummary>, ReportsServiceError> {
        let since = utc_day_start(Timestamp::now())?;

        let mut tx = self.db.begin().await?;

        let condominiums = self.repository.condominiums_since(&mut tx, since).await?;

        let mut summaries = Vec::with_capacity(condominiums.len());

        for condominium in condominiums {
            let (generated, validated, denied) =
                self.repository.counters(&mut tx, since, &condominium).await?;

            let recent = self
                .repository
                .recent_codes(&mut tx, &condominium, since, RECENT_CODES_PER_CONDOMINIUM)
                .await?;

            summaries.push(ActivitySummary {
                condominium,
                counters: DailyCounters {
                    generated,
                    validated,
                    denied,
                },
                recent,
            });
        }

        tx.commit().await?;

        Ok(summaries)
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Per-condominium activity since the start of the UTC day.
    async fn daily_activity(&self) -> Result<Vec<ActivitySummary>, ReportsServiceError>;
}
