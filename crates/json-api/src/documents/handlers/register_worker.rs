//! Register Worker Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aldaba_app::domain::documents::{
    data::{NewWorker, PhotoPayload},
    records::WorkerRecord,
};

use crate::{documents::errors::into_status_error, extensions::*, state::State};

/// Register Worker Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterWorkerRequest {
    #[serde(rename = "houseNumber")]
    pub house_number: String,

    pub condominio: String,

    #[serde(rename = "workerName")]
    pub worker_name: String,

    #[serde(rename = "workerType", default)]
    pub worker_type: Option<String>,

    /// Base64 photo, `data:` URL prefix tolerated.
    #[serde(rename = "photoBase64", default)]
    pub photo_base64: Option<String>,
}

/// Wire shape of one worker record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WorkerData {
    pub id: Uuid,

    #[serde(rename = "houseNumber")]
    pub house_number: String,

    pub condominio: String,

    pub nombre: String,

    pub tipo: String,

    /// `procesando` until the background sync finishes.
    pub status: String,

    #[serde(rename = "createdAt")]
    pub created_at: String,

    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<WorkerRecord> for WorkerData {
    fn from(record: WorkerRecord) -> Self {
        Self {
            id: record.uuid,
            house_number: record.house_number,
            condominio: record.condominium,
            nombre: record.name,
            tipo: record.worker_type,
            status: record.status.as_str().to_string(),
            created_at: record.created_at.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

/// Register Worker Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterWorkerResponse {
    pub success: bool,
    pub message: String,
    pub data: WorkerData,
}

/// Register Worker Handler
///
/// Answers as soon as the row is stored; the photo uploads in the
/// background.
#[endpoint(
    tags("documents"),
    summary = "Register a worker",
    responses(
        (status_code = StatusCode::OK, description = "Worker stored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterWorkerRequest>,
    depot: &mut Depot,
) -> Result<Json<RegisterWorkerResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.house_number.trim().is_empty()
        || request.condominio.trim().is_empty()
        || request.worker_name.trim().is_empty()
    {
        return Err(StatusError::bad_request()
            .brief("Faltan datos requeridos: houseNumber, condominio, workerName"));
    }

    let photo = decode_photo(request.photo_base64.as_deref())?;

    let record = state
        .app
        .documents
        .register_worker(NewWorker {
            house_number: request.house_number,
            condominium: request.condominio,
            name: request.worker_name,
            worker_type: request.worker_type,
            photo,
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(RegisterWorkerResponse {
        success: true,
        message: "Trabajador registrado correctamente".to_string(),
        data: record.into(),
    }))
}

/// Decode an optional base64 photo; an empty string counts as no photo.
pub(crate) fn decode_photo(
    photo_base64: Option<&str>,
) -> Result<Option<PhotoPayload>, StatusError> {
    match photo_base64 {
        None => Ok(None),
        Some(encoded) if encoded.trim().is_empty() => Ok(None),
        Some(encoded) => PhotoPayload::from_base64(encoded)
            .map(Some)
            .map_err(|_decode_error| StatusError::bad_request().brief("Foto inválida")),
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use aldaba_app::domain::documents::MockDocumentsService;

    use crate::test_helpers::{documents_service, make_worker_record};

    use super::*;

    fn make_service(documents: MockDocumentsService) -> Service {
        documents_service(
            documents,
            Router::with_path("api/register-worker").post(handler),
        )
    }

    #[tokio::test]
    async fn test_register_worker_answers_procesando() -> TestResult {
        let mut documents = MockDocumentsService::new();

        documents
            .expect_register_worker()
            .once()
            .withf(|new| {
                new.house_number == "42"
                    && new.condominium == "Los Pinos"
                    && new.name == "Juan Perez"
                    && new.worker_type.as_deref() == Some("jardinero")
                    && new.photo.is_some()
            })
            .return_once(|new| Ok(make_worker_record(new)));

        documents.expect_register_ine().never();
        documents.expect_list_ines().never();

        let mut res = TestClient::post("http://example.com/api/register-worker")
            .json(&json!({
                "houseNumber": "42",
                "condominio": "Los Pinos",
                "workerName": "Juan Perez",
                "workerType": "jardinero",
                "photoBase64": "data:image/jpeg;base64,/9j/2Q==",
            }))
            .send(&make_service(documents))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: RegisterWorkerResponse = res.take_json().await?;

        assert!(body.success);
        assert_eq!(body.data.status, "procesando");
        assert_eq!(body.data.tipo, "jardinero");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_worker_without_name_returns_400() -> TestResult {
        let mut documents = MockDocumentsService::new();

        documents.expect_register_worker().never();

        let res = TestClient::post("http://example.com/api/register-worker")
            .json(&json!({ "houseNumber": "42", "condominio": "Los Pinos", "workerName": "" }))
            .send(&make_service(documents))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_worker_with_bad_photo_returns_400() -> TestResult {
        let mut documents = MockDocumentsService::new();

        documents.expect_register_worker().never();

        let res = TestClient::post("http://example.com/api/register-worker")
            .json(&json!({
                "houseNumber": "42",
                "condominio": "Los Pinos",
                "workerName": "Juan",
                "photoBase64": "!!not base64!!",
            }))
            .send(&make_service(documents))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
