//! Push tokens service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::push_tokens::{
        data::NewPushToken,
        errors::PushTokensServiceError,
        records::{PushTokenRecord, PushTokenUpsert},
        repository::PgPushTokensRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPushTokensService {
    db: Db,
    repository: PgPushTokensRepository,
}

impl PgPushTokensService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPushTokensRepository::new(),
        }
    }
}

#[async_trait]
impl PushTokensService for PgPushTokensService {
    async fn upsert(&self, new: NewPushToken) -> Result<PushTokenUpsert, PushTokensServiceError> {
        let now = Timestamp::now();

        let mut tx = self.db.begin().await?;

        let upsert = self
            .repository
            .upsert(
                &mut tx,
                Uuid::new_v4(),
                &new.house_number,
                &new.condominium,
                &new.push_token,
                &new.platform,
                now,
            )
            .await?;

        tx.commit().await?;

        Ok(upsert)
    }

    async fn find(
        &self,
        house_number: &str,
        condominium: &str,
    ) -> Result<Option<PushTokenRecord>, PushTokensServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .find(&mut tx, house_number, condominium)
            .await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait PushTokensService: Send + Sync {
    /// Register or refresh the token for a (house, condominium) pair.
    async fn upsert(&self, new: NewPushToken) -> Result<PushTokenUpsert, PushTokensServiceError>;

    /// Active token for a (house, condominium) pair, if any.
    async fn find(
        &self,
        house_number: &str,
        condominium: &str,
    ) -> Result<Option<PushTokenRecord>, PushTokensServiceError>;
}
