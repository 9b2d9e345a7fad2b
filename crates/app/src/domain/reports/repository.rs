//! Reports Repository

use aldaba::{lifecycle::CodeStatus, report::ReportEntry};
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Error, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

const DISTINCT_CONDOMINIUMS_SQL: &str = include_str!("sql/distinct_condominiums.sql");
const CONDOMINIUM_COUNTERS_SQL: &str = include_str!("sql/condominium_counters.sql");
const RECENT_CODES_SQL: &str = include_str!("sql/recent_codes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReportsRepository;

fn entry_from_row(row: &PgRow) -> sqlx::Result<ReportEntry> {
    let status: String = row.try_get("status")?;

    let status = status
        .parse::<CodeStatus>()
        .map_err(|e| Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

    Ok(ReportEntry {
        code: row.try_get("code")?,
        house_number: row.try_get("house_number")?,
        status,
        created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
    })
}

impl PgReportsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn condominiums_since(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar(DISTINCT_CONDOMINIUMS_SQL)
            .bind(SqlxTimestamp::from(since))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn counters(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        since: Timestamp,
        condominium: &str,
    ) -> Result<(i64, i64, i64), sqlx::Error> {
        query_as(CONDOMINIUM_COUNTERS_SQL)
            .bind(SqlxTimestamp::from(since))
            .bind(condominium)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn recent_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        condominium: &str,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<ReportEntry>, sqlx::Error> {
        let rows = sqlx::query(RECENT_CODES_SQL)
            .bind(condominium)
            .bind(SqlxTimestamp::from(since))
            .bind(limit)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(entry_from_row).collect()
    }
}
