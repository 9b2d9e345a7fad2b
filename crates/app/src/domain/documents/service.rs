//! Documents service.
//!
//! Registration answers as soon as the row is stored; photo upload and the
//! spreadsheet append run detached through the sync dispatcher.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::documents::{
        data::{NewIne, NewWorker},
        errors::DocumentsServiceError,
        records::{DocumentStatus, IneRecord, WorkerRecord},
        repository::PgDocumentsRepository,
    },
    integrations::dispatcher::SyncDispatcher,
};

const DEFAULT_WORKER_TYPE: &str = "general";

#[derive(Debug, Clone)]
pub struct PgDocumentsService {
    db: Db,
    sync: SyncDispatcher,
    repository: PgDocumentsRepository,
}

impl PgDocumentsService {
    #[must_use]
    pub fn new(db: Db, sync: SyncDispatcher) -> Self {
        Self {
            db,
            sync,
            repository: PgDocumentsRepository::new(),
        }
    }
}

#[async_trait]
impl DocumentsService for PgDocumentsService {
    async fn register_worker(
        &self,
        new: NewWorker,
    ) -> Result<WorkerRecord, DocumentsServiceError> {
        let now = Timestamp::now();

        let record = WorkerRecord {
            uuid: Uuid::new_v4(),
            house_number: new.house_number,
            condominium: new.condominium,
            name: new.name,
            worker_type: new
                .worker_type
                .unwrap_or_else(|| DEFAULT_WORKER_TYPE.to_string()),
            photo_file_id: None,
            status: DocumentStatus::Processing,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await?;

        self.repository.create_worker(&mut tx, &record).await?;

        tx.commit().await?;

        self.sync.spawn_worker_sync(record.clone(), new.photo);

        Ok(record)
    }

    async fn register_ine(&self, new: NewIne) -> Result<IneRecord, DocumentsServiceError> {
        let now = Timestamp::now();

        let record = IneRecord {
            uuid: Uuid::new_v4(),
            house_number: new.house_number,
            condominium: new.condominium,
            first_name: new.first_name,
            last_name: new.last_name,
            ine_number: new.ine_number,
            curp: new.curp,
            front_file_id: None,
            back_file_id: None,
            notes: new.notes,
            status: DocumentStatus::Processing,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await?;

        self.repository.create_ine(&mut tx, &record).await?;

        tx.commit().await?;

        self.sync
            .spawn_ine_sync(record.clone(), new.front_photo, new.back_photo);

        Ok(record)
    }

    async fn list_ines(
        &self,
        house_number: &str,
        condominium: &str,
    ) -> Result<Vec<IneRecord>, DocumentsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .repository
            .list_ines(&mut tx, house_number, condominium)
            .await?;

        tx.commit().await?;

        Ok(records)
    }
}

#[automock]
#[async_trait]
pub trait DocumentsService: Send + Sync {
    /// Store a worker record and kick off the evidence sync.
    async fn register_worker(&self, new: NewWorker)
    -> Result<WorkerRecord, DocumentsServiceError>;

    /// Store an INE record and kick off the evidence sync.
    async fn register_ine(&self, new: NewIne) -> Result<IneRecord, DocumentsServiceError>;

    /// Active INE records for a house, newest first.
    async fn list_ines(
        &self,
        house_number: &str,
        condominium: &str,
    ) -> Result<Vec<IneRecord>, DocumentsServiceError>;
}
