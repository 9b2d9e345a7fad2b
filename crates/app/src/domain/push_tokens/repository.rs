//! Push Tokens Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::push_tokens::records::{PushTokenRecord, PushTokenUpsert};

const UPSERT_TOKEN_SQL: &str = include_str!("sql/upsert_token.sql");
const FIND_TOKEN_SQL: &str = include_str!("sql/find_token.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPushTokensRepository;

fn record_from_row(row: &PgRow) -> sqlx::Result<PushTokenRecord> {
    Ok(PushTokenRecord {
        uuid: row.try_get("uuid")?,
        house_number: row.try_get("house_number")?,
        condominium: row.try_get("condominium")?,
        push_token: row.try_get("push_token")?,
        platform: row.try_get("platform")?,
        created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
    })
}

impl<'r> FromRow<'r, PgRow> for PushTokenRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        record_from_row(row)
    }
}

impl<'r> FromRow<'r, PgRow> for PushTokenUpsert {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            record: record_from_row(row)?,
            inserted: row.try_get("inserted")?,
        })
    }
}

impl PgPushTokensRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn upsert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: Uuid,
        house_number: &str,
        condominium: &str,
        push_token: &str,
        platform: &str,
        now: Timestamp,
    ) -> Result<PushTokenUpsert, sqlx::Error> {
        query_as::<Postgres, PushTokenUpsert>(UPSERT_TOKEN_SQL)
            .bind(uuid)
            .bind(house_number)
            .bind(condominium)
            .bind(push_token)
            .bind(platform)
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        house_number: &str,
        condominium: &str,
    ) -> Result<Option<PushTokenRecord>, sqlx::Error> {
        query_as::<Postgres, PushTokenRecord>(FIND_TOKEN_SQL)
            .bind(house_number)
            .bind(condominium)
            .fetch_optional(&mut **tx)
            .await
    }
}
