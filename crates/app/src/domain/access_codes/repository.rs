//! Access Codes Repository

use aldaba::lifecycle::CodeStatus;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Error, FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::access_codes::records::QrCodeRecord;

const CREATE_CODE_SQL: &str = include_str!("sql/create_code.sql");
const GET_CODE_SQL: &str = include_str!("sql/get_code.sql");
const MARK_USED_SQL: &str = include_str!("sql/mark_used.sql");
const MARK_EXPIRED_SQL: &str = include_str!("sql/mark_expired.sql");
const HISTORY_SQL: &str = include_str!("sql/history.sql");
const DAILY_COUNTERS_SQL: &str = include_str!("sql/daily_counters.sql");
const RESET_CODES_SQL: &str = include_str!("sql/reset_codes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgQrCodesRepository;

impl<'r> FromRow<'r, PgRow> for QrCodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<CodeStatus>()
            .map_err(|e| Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            code: row.try_get("code")?,
            house_number: row.try_get("house_number")?,
            condominium: row.try_get("condominium")?,
            visitor_name: row.try_get("visitor_name")?,
            resident_name: row.try_get("resident_name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("used_at")?
                .map(SqlxTimestamp::to_jiff),
            is_used: row.try_get("is_used")?,
            status,
        })
    }
}

impl PgQrCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &QrCodeRecord,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_CODE_SQL)
            .bind(record.uuid)
            .bind(&record.code)
            .bind(&record.house_number)
            .bind(&record.condominium)
            .bind(&record.visitor_name)
            .bind(&record.resident_name)
            .bind(SqlxTimestamp::from(record.created_at))
            .bind(SqlxTimestamp::from(record.expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<QrCodeRecord>, sqlx::Error> {
        query_as::<Postgres, QrCodeRecord>(GET_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Atomically spend a code. Returns `None` when the code was already
    /// used, already past expiry, or does not exist.
    pub(crate) async fn mark_used(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        now: Timestamp,
    ) -> Result<Option<QrCodeRecord>, sqlx::Error> {
        query_as::<Postgres, QrCodeRecord>(MARK_USED_SQL)
            .bind(code)
            .bind(SqlxTimestamp::from(now))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn mark_expired(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_EXPIRED_SQL)
            .bind(code)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        house_number: &str,
        condominium: &str,
    ) -> Result<Vec<QrCodeRecord>, sqlx::Error> {
        query_as::<Postgres, QrCodeRecord>(HISTORY_SQL)
            .bind(house_number)
            .bind(condominium)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn daily_counters(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
    ) -> Result<(i64, i64, i64), sqlx::Error> {
        query_as(DAILY_COUNTERS_SQL)
            .bind(SqlxTimestamp::from(since))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn reset(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        condominium: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RESET_CODES_SQL)
            .bind(condominium)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
