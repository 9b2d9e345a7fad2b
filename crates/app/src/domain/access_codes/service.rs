//! Access codes service.

use aldaba::{
    counters::{DailyCounters, utc_day_start},
    lifecycle::{self, CodeStatus, Verdict},
};
use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rand::{Rng, distributions::Alphanumeric};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::access_codes::{
        data::NewQrCode,
        errors::AccessCodesServiceError,
        records::{QrCodeRecord, ValidationContext, ValidationOutcome},
        repository::PgQrCodesRepository,
    },
    integrations::dispatcher::SyncDispatcher,
};

const CODE_SUFFIX_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct PgAccessCodesService {
    db: Db,
    sync: SyncDispatcher,
    repository: PgQrCodesRepository,
}

impl PgAccessCodesService {
    #[must_use]
    pub fn new(db: Db, sync: SyncDispatcher) -> Self {
        Self {
            db,
            sync,
            repository: PgQrCodesRepository::new(),
        }
    }
}

#[async_trait]
impl AccessCodesService for PgAccessCodesService {
    async fn register(&self, new: NewQrCode) -> Result<QrCodeRecord, AccessCodesServiceError> {
        let now = Timestamp::now();
        let code = lifecycle::compose_code(now, &new.house_number, &code_suffix());

        let record = QrCodeRecord {
            uuid: Uuid::new_v4(),
            code,
            house_number: new.house_number,
            condominium: new.condominium,
            visitor_name: new.visitor_name,
            resident_name: new.resident_name,
            created_at: now,
            expires_at: lifecycle::expiry(now),
            used_at: None,
            is_used: false,
            status: CodeStatus::Active,
        };

        let mut tx = self.db.begin().await?;

        self.repository.create(&mut tx, &record).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn validate(&self, code: &str) -> Result<ValidationOutcome, AccessCodesServiceError> {
        let now = Timestamp::now();

        let mut tx = self.db.begin().await?;

        let Some(existing) = self.repository.get_by_code(&mut tx, code).await? else {
            tx.commit().await?;

            return Ok(ValidationOutcome {
                verdict: Verdict::Unknown,
                context: None,
            });
        };

        let mut verdict = lifecycle::assess(existing.is_used, existing.expires_at, now);

        match verdict {
            Verdict::Granted => {
                // The conditional update is the authority; losing it means
                // another gate spent the code between our read and write.
                if self.repository.mark_used(&mut tx, code, now).await?.is_none() {
                    verdict = Verdict::AlreadyUsed;
                }
            }
            Verdict::Expired => {
                self.repository.mark_expired(&mut tx, code).await?;
            }
            Verdict::AlreadyUsed | Verdict::Unknown => {}
        }

        tx.commit().await?;

        let context = ValidationContext::from(&existing);

        if verdict.is_valid() {
            self.sync.notify_validation(code, &context);
        }

        Ok(ValidationOutcome {
            verdict,
            context: Some(context),
        })
    }

    async fn history(
        &self,
        house_number: &str,
        condominium: &str,
    ) -> Result<Vec<QrCodeRecord>, AccessCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .repository
            .history(&mut tx, house_number, condominium)
            .await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn daily_counters(&self) -> Result<DailyCounters, AccessCodesServiceError> {
        let since = utc_day_start(Timestamp::now())?;

        let mut tx = self.db.begin().await?;

        let (generated, validated, denied) =
            self.repository.daily_counters(&mut tx, since).await?;

        tx.commit().await?;

        Ok(DailyCounters {
            generated,
            validated,
            denied,
        })
    }

    async fn reset(&self, condominium: &str) -> Result<u64, AccessCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let removed = self.repository.reset(&mut tx, condominium).await?;

        tx.commit().await?;

        Ok(removed)
    }
}

fn code_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_SUFFIX_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

#[automock]
#[async_trait]
pub trait AccessCodesService: Send + Sync {
    /// Issue a new code for a house, valid for 24 hours.
    async fn register(&self, new: NewQrCode) -> Result<QrCodeRecord, AccessCodesServiceError>;

    /// Single-use/expiry check-and-mark for a presented code.
    async fn validate(&self, code: &str) -> Result<ValidationOutcome, AccessCodesServiceError>;

    /// Most recent codes for a house, newest first.
    async fn history(
        &self,
        house_number: &str,
        condominium: &str,
    ) -> Result<Vec<QrCodeRecord>, AccessCodesServiceError>;

    /// Today's issue/validate/deny tallies (UTC day).
    async fn daily_counters(&self) -> Result<DailyCounters, AccessCodesServiceError>;

    /// Delete every code belonging to a condominium. Returns the count.
    async fn reset(&self, condominium: &str) -> Result<u64, AccessCodesServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_lowercase_alphanumeric() {
        let suffix = code_suffix();

        assert_eq!(suffix.len(), CODE_SUFFIX_LEN);
        assert!(
            suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
            "got {suffix}"
        );
    }
}
