//! Background fan-out: photo upload, spreadsheet append, push notification.
//!
//! Every job runs detached from the HTTP response. A step failure marks the
//! record `error` and is logged; it never propagates to the caller. Clients
//! left unconfigured degrade to a logged skip so the server stays usable in
//! development.

use std::sync::Arc;

use aldaba::evidence::{EvidencePath, PhotoSide, photo_file_name};
use jiff::Timestamp;
use tracing::{debug, error, info};

use crate::{
    database::Db,
    domain::{
        access_codes::records::ValidationContext,
        documents::{
            data::PhotoPayload,
            records::{DocumentStatus, IneRecord, WorkerRecord},
            repository::PgDocumentsRepository,
        },
        push_tokens::repository::PgPushTokensRepository,
    },
    integrations::{
        drive::DriveClient,
        push::{ExpoPushClient, PushNotification},
        sheets::SheetsClient,
    },
};

/// Fans registration side effects out to Drive, Sheets, and Expo.
#[derive(Debug, Clone)]
pub struct SyncDispatcher {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    db: Db,
    drive: Option<DriveClient>,
    sheets: Option<SheetsClient>,
    push: Option<ExpoPushClient>,
    documents: PgDocumentsRepository,
    push_tokens: PgPushTokensRepository,
}

impl SyncDispatcher {
    /// Build a dispatcher; `None` clients disable the matching step.
    #[must_use]
    pub fn new(
        db: Db,
        drive: Option<DriveClient>,
        sheets: Option<SheetsClient>,
        push: Option<ExpoPushClient>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                db,
                drive,
                sheets,
                push,
                documents: PgDocumentsRepository::new(),
                push_tokens: PgPushTokensRepository::new(),
            }),
        }
    }

    /// Detach the evidence sync for a worker registration.
    pub fn spawn_worker_sync(&self, record: WorkerRecord, photo: Option<PhotoPayload>) {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            inner.worker_sync(record, photo).await;
        });
    }

    /// Detach the evidence sync for an INE registration.
    pub fn spawn_ine_sync(
        &self,
        record: IneRecord,
        front: Option<PhotoPayload>,
        back: Option<PhotoPayload>,
    ) {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            inner.ine_sync(record, front, back).await;
        });
    }

    /// Detach the push notification for a granted validation.
    pub fn notify_validation(&self, code: &str, context: &ValidationContext) {
        let inner = Arc::clone(&self.inner);
        let code = code.to_string();
        let context = context.clone();

        tokio::spawn(async move {
            inner.send_validation_push(&code, &context).await;
        });
    }
}

impl Inner {
    async fn worker_sync(&self, record: WorkerRecord, photo: Option<PhotoPayload>) {
        let mut failed = false;

        let photo_file_id = match self
            .upload_one(&record.condominium, &record.house_number, record.created_at,
                "Trabajador", PhotoSide::Portrait, photo)
            .await
        {
            Ok(file_id) => file_id,
            Err(()) => {
                failed = true;

                None
            }
        };

        if let Some(sheets) = &self.sheets {
            let tab = format!("{}_Trabajadores", record.condominium);
            let row = worker_row(&record, photo_file_id.as_deref());

            if let Err(sheets_error) = sheets.append_row(&tab, &row).await {
                error!(
                    worker = %record.uuid,
                    "failed to append worker row to sheet: {sheets_error}"
                );

                failed = true;
            }
        }

        let status = if failed {
            DocumentStatus::Failed
        } else {
            DocumentStatus::Active
        };

        if let Err(db_error) = self
            .finish_worker(record.uuid, status, photo_file_id.as_deref())
            .await
        {
            error!(worker = %record.uuid, "failed to record worker upload state: {db_error}");

            return;
        }

        info!(worker = %record.uuid, status = %status, "worker sync finished");
    }

    async fn ine_sync(
        &self,
        record: IneRecord,
        front: Option<PhotoPayload>,
        back: Option<PhotoPayload>,
    ) {
        let mut failed = false;

        let front_file_id = match self
            .upload_one(&record.condominium, &record.house_number, record.created_at,
                "INE", PhotoSide::Front, front)
            .await
        {
            Ok(file_id) => file_id,
            Err(()) => {
                failed = true;

                None
            }
        };

        let back_file_id = match self
            .upload_one(&record.condominium, &record.house_number, record.created_at,
                "INE", PhotoSide::Back, back)
            .await
        {
            Ok(file_id) => file_id,
            Err(()) => {
                failed = true;

                None
            }
        };

        if let Some(sheets) = &self.sheets {
            let tab = format!("{}_INE", record.condominium);
            let row = ine_row(&record, front_file_id.as_deref(), back_file_id.as_deref());

            if let Err(sheets_error) = sheets.append_row(&tab, &row).await {
                error!(ine = %record.uuid, "failed to append INE row to sheet: {sheets_error}");

                failed = true;
            }
        }

        let status = if failed {
            DocumentStatus::Failed
        } else {
            DocumentStatus::Active
        };

        if let Err(db_error) = self
            .finish_ine(
                record.uuid,
                status,
                front_file_id.as_deref(),
                back_file_id.as_deref(),
            )
            .await
        {
            error!(ine = %record.uuid, "failed to record INE upload state: {db_error}");

            return;
        }

        info!(ine = %record.uuid, status = %status, "INE sync finished");
    }

    /// Upload one photo, if both a photo and the Drive client are present.
    ///
    /// Returns `Err(())` only for a real upload failure; a missing photo or a
    /// disabled client is a successful no-op.
    async fn upload_one(
        &self,
        condominium: &str,
        house_number: &str,
        taken_at: Timestamp,
        prefix: &str,
        side: PhotoSide,
        photo: Option<PhotoPayload>,
    ) -> Result<Option<String>, ()> {
        let Some(photo) = photo else {
            return Ok(None);
        };

        let Some(drive) = &self.drive else {
            debug!("drive sync disabled, skipping photo upload");

            return Ok(None);
        };

        let path = EvidencePath::new(condominium, house_number, taken_at);

        let folder_id = match drive.ensure_folder_path(&path).await {
            Ok(folder_id) => folder_id,
            Err(drive_error) => {
                error!(
                    path = %path.cache_key(),
                    "failed to ensure evidence folder: {drive_error}"
                );

                return Err(());
            }
        };

        let file_name = photo_file_name(prefix, house_number, taken_at, side);

        match drive.upload_photo(&folder_id, &file_name, photo.as_bytes()).await {
            Ok(uploaded) => {
                info!(file = %uploaded.name, id = %uploaded.file_id, "photo uploaded");

                Ok(Some(uploaded.file_id))
            }
            Err(drive_error) => {
                error!(file = %file_name, "failed to upload photo: {drive_error}");

                Err(())
            }
        }
    }

    async fn finish_worker(
        &self,
        uuid: uuid::Uuid,
        status: DocumentStatus,
        photo_file_id: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        self.documents
            .set_worker_upload(&mut tx, uuid, status, photo_file_id, Timestamp::now())
            .await?;

        tx.commit().await
    }

    async fn finish_ine(
        &self,
        uuid: uuid::Uuid,
        status: DocumentStatus,
        front_file_id: Option<&str>,
        back_file_id: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin().await?;

        self.documents
            .set_ine_upload(
                &mut tx,
                uuid,
                status,
                front_file_id,
                back_file_id,
                Timestamp::now(),
            )
            .await?;

        tx.commit().await
    }

    async fn send_validation_push(&self, code: &str, context: &ValidationContext) {
        let Some(push) = &self.push else {
            debug!("push notifications disabled");

            return;
        };

        let token = match self.find_token(&context.house_number, &context.condominium).await {
            Ok(token) => token,
            Err(db_error) => {
                error!("failed to look up push token: {db_error}");

                return;
            }
        };

        let Some(token) = token else {
            info!(
                house = %context.house_number,
                condominium = %context.condominium,
                "no push token registered for validated code"
            );

            return;
        };

        let notification = PushNotification {
            title: "✅ Código QR Validado".to_string(),
            body: format!(
                "Tu código QR fue validado exitosamente. Válido hasta: {}",
                context.expires_at
            ),
            data: serde_json::json!({
                "type": "qr_validated",
                "houseNumber": context.house_number,
                "condominio": context.condominium,
                "timestamp": Timestamp::now().to_string(),
                "code": code,
            }),
        };

        match push.send(&token.push_token, &notification).await {
            Ok(()) => info!(
                house = %context.house_number,
                condominium = %context.condominium,
                "validation notification sent"
            ),
            Err(push_error) => error!("failed to send validation notification: {push_error}"),
        }
    }

    async fn find_token(
        &self,
        house_number: &str,
        condominium: &str,
    ) -> Result<Option<crate::domain::push_tokens::records::PushTokenRecord>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let token = self.push_tokens.find(&mut tx, house_number, condominium).await?;

        tx.commit().await?;

        Ok(token)
    }
}

fn worker_row(record: &WorkerRecord, photo_file_id: Option<&str>) -> Vec<String> {
    vec![
        record.created_at.to_string(),
        record.house_number.clone(),
        record.name.clone(),
        record.worker_type.clone(),
        photo_file_id.unwrap_or_default().to_string(),
    ]
}

fn ine_row(record: &IneRecord, front: Option<&str>, back: Option<&str>) -> Vec<String> {
    vec![
        record.created_at.to_string(),
        record.house_number.clone(),
        record.first_name.clone(),
        record.last_name.clone(),
        record.ine_number.clone(),
        record.curp.clone(),
        front.unwrap_or_default().to_string(),
        back.unwrap_or_default().to_string(),
        record.notes.clone(),
    ]
}
