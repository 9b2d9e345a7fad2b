//! Register INE Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aldaba_app::domain::documents::{data::NewIne, records::IneRecord};

use crate::{
    documents::{errors::into_status_error, register_worker::decode_photo},
    extensions::*,
    state::State,
};

/// Register INE Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterIneRequest {
    #[serde(rename = "houseNumber")]
    pub house_number: String,

    pub condominio: String,

    pub nombre: String,

    #[serde(default)]
    pub apellido: Option<String>,

    #[serde(rename = "numeroINE", default)]
    pub numero_ine: Option<String>,

    #[serde(default)]
    pub curp: Option<String>,

    /// Base64 front photo, `data:` URL prefix tolerated.
    #[serde(rename = "photoFrontal", default)]
    pub photo_frontal: Option<String>,

    /// Base64 back photo, `data:` URL prefix tolerated.
    #[serde(rename = "photoTrasera", default)]
    pub photo_trasera: Option<String>,

    #[serde(default)]
    pub observaciones: Option<String>,
}

/// Wire shape of one INE record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct IneData {
    pub id: Uuid,

    #[serde(rename = "houseNumber")]
    pub house_number: String,

    pub condominio: String,

    pub nombre: String,

    pub apellido: String,

    #[serde(rename = "numeroINE")]
    pub numero_ine: String,

    pub curp: String,

    pub observaciones: String,

    #[serde(rename = "frontFileId", default, skip_serializing_if = "Option::is_none")]
    pub front_file_id: Option<String>,

    #[serde(rename = "backFileId", default, skip_serializing_if = "Option::is_none")]
    pub back_file_id: Option<String>,

    /// `procesando` until the background sync finishes.
    pub status: String,

    #[serde(rename = "createdAt")]
    pub created_at: String,

    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<IneRecord> for IneData {
    fn from(record: IneRecord) -> Self {
        Self {
            id: record.uuid,
            house_number: record.house_number,
            condominio: record.condominium,
            nombre: record.first_name,
            apellido: record.last_name,
            numero_ine: record.ine_number,
            curp: record.curp,
            observaciones: record.notes,
            front_file_id: record.front_file_id,
            back_file_id: record.back_file_id,
            status: record.status.as_str().to_string(),
            created_at: record.created_at.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

/// Register INE Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterIneResponse {
    pub success: bool,
    pub message: String,
    pub data: IneData,
}

/// Register INE Handler
///
/// Answers as soon as the row is stored; both photo sides upload in the
/// background.
#[endpoint(
    tags("documents"),
    summary = "Register an INE document",
    responses(
        (status_code = StatusCode::OK, description = "INE stored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterIneRequest>,
    depot: &mut Depot,
) -> Result<Json<RegisterIneResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.house_number.trim().is_empty()
        || request.condominio.trim().is_empty()
        || request.nombre.trim().is_empty()
    {
        return Err(StatusError::bad_request()
            .brief("Faltan datos requeridos: houseNumber, condominio, nombre"));
    }

    let front_photo = decode_photo(request.photo_frontal.as_deref())?;
    let back_photo = decode_photo(request.photo_trasera.as_deref())?;

    let record = state
        .app
        .documents
        .register_ine(NewIne {
            house_number: request.house_number,
            condominium: request.condominio,
            first_name: request.nombre,
            last_name: request.apellido.unwrap_or_default(),
            ine_number: request.numero_ine.unwrap_or_default(),
            curp: request.curp.unwrap_or_default(),
            front_photo,
            back_photo,
            notes: request.observaciones.unwrap_or_default(),
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(RegisterIneResponse {
        success: true,
        message: "INE registrado correctamente".to_string(),
        data: record.into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use aldaba_app::domain::documents::MockDocumentsService;

    use crate::test_helpers::{documents_service, make_ine_record};

    use super::*;

    fn make_service(documents: MockDocumentsService) -> Service {
        documents_service(documents, Router::with_path("api/register-ine").post(handler))
    }

    #[tokio::test]
    async fn test_register_ine_answers_procesando() -> TestResult {
        let mut documents = MockDocumentsService::new();

        documents
            .expect_register_ine()
            .once()
            .withf(|new| {
                new.house_number == "99"
                    && new.condominium == "Unica"
                    && new.first_name == "Prueba"
                    && new.last_name == "Test"
                    && new.ine_number == "1234567890123"
                    && new.front_photo.is_some()
                    && new.back_photo.is_some()
            })
            .return_once(|new| Ok(make_ine_record(new)));

        documents.expect_register_worker().never();
        documents.expect_list_ines().never();

        let mut res = TestClient::post("http://example.com/api/register-ine")
            .json(&json!({
                "houseNumber": "99",
                "condominio": "Unica",
                "nombre": "Prueba",
                "apellido": "Test",
                "numeroINE": "1234567890123",
                "curp": "TEST123456HDFRRS09",
                "photoFrontal": "data:image/jpeg;base64,/9j/2Q==",
                "photoTrasera": "data:image/jpeg;base64,/9j/2Q==",
                "observaciones": "Registro de prueba",
            }))
            .send(&make_service(documents))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: RegisterIneResponse = res.take_json().await?;

        assert!(body.success);
        assert_eq!(body.data.status, "procesando");
        assert_eq!(body.data.nombre, "Prueba");
        assert_eq!(body.data.numero_ine, "1234567890123");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_ine_without_nombre_returns_400() -> TestResult {
        let mut documents = MockDocumentsService::new();

        documents.expect_register_ine().never();

        let res = TestClient::post("http://example.com/api/register-ine")
            .json(&json!({ "houseNumber": "99", "condominio": "Unica", "nombre": "" }))
            .send(&make_service(documents))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_ine_photos_are_optional() -> TestResult {
        let mut documents = MockDocumentsService::new();

        documents
            .expect_register_ine()
            .once()
            .withf(|new| new.front_photo.is_none() && new.back_photo.is_none())
            .return_once(|new| Ok(make_ine_record(new)));

        let res = TestClient::post("http://example.com/api/register-ine")
            .json(&json!({ "houseNumber": "99", "condominio": "Unica", "nombre": "Prueba" }))
            .send(&make_service(documents))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
