//! Documents Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Error, FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::documents::records::{DocumentStatus, IneRecord, WorkerRecord};

const CREATE_WORKER_SQL: &str = include_str!("sql/create_worker.sql");
const CREATE_INE_SQL: &str = include_str!("sql/create_ine.sql");
const LIST_INES_SQL: &str = include_str!("sql/list_ines.sql");
const SET_WORKER_UPLOAD_SQL: &str = include_str!("sql/set_worker_upload.sql");
const SET_INE_UPLOAD_SQL: &str = include_str!("sql/set_ine_upload.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDocumentsRepository;

fn status_from_row(row: &PgRow) -> sqlx::Result<DocumentStatus> {
    let status: String = row.try_get("status")?;

    status
        .parse::<DocumentStatus>()
        .map_err(|e| Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })
}

impl<'r> FromRow<'r, PgRow> for IneRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            house_number: row.try_get("house_number")?,
            condominium: row.try_get("condominium")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            ine_number: row.try_get("ine_number")?,
            curp: row.try_get("curp")?,
            front_file_id: row.try_get("front_file_id")?,
            back_file_id: row.try_get("back_file_id")?,
            notes: row.try_get("notes")?,
            status: status_from_row(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl PgDocumentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_worker(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &WorkerRecord,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_WORKER_SQL)
            .bind(record.uuid)
            .bind(&record.house_number)
            .bind(&record.condominium)
            .bind(&record.name)
            .bind(&record.worker_type)
            .bind(SqlxTimestamp::from(record.created_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn create_ine(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &IneRecord,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_INE_SQL)
            .bind(record.uuid)
            .bind(&record.house_number)
            .bind(&record.condominium)
            .bind(&record.first_name)
            .bind(&record.last_name)
            .bind(&record.ine_number)
            .bind(&record.curp)
            .bind(&record.notes)
            .bind(SqlxTimestamp::from(record.created_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_ines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        house_number: &str,
        condominium: &str,
    ) -> Result<Vec<IneRecord>, sqlx::Error> {
        query_as::<Postgres, IneRecord>(LIST_INES_SQL)
            .bind(house_number)
            .bind(condominium)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_worker_upload(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: Uuid,
        status: DocumentStatus,
        photo_file_id: Option<&str>,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_WORKER_UPLOAD_SQL)
            .bind(uuid)
            .bind(status.as_str())
            .bind(photo_file_id)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_ine_upload(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: Uuid,
        status: DocumentStatus,
        front_file_id: Option<&str>,
        back_file_id: Option<&str>,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_INE_UPLOAD_SQL)
            .bind(uuid)
            .bind(status.as_str())
            .bind(front_file_id)
            .bind(back_file_id)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
