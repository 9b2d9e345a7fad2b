//! Register Code Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use aldaba_app::domain::access_codes::{data::NewQrCode, records::QrCodeRecord};

use crate::{codes::errors::into_status_error, extensions::*, state::State};

/// Register Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterCodeRequest {
    #[serde(rename = "houseNumber")]
    pub house_number: String,

    pub condominio: String,

    #[serde(default)]
    pub visitante: Option<String>,

    #[serde(default)]
    pub residente: Option<String>,
}

/// Wire shape of one QR code, legacy aliases included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CodeData {
    pub code: String,

    /// Legacy alias of `code`.
    pub codigo: String,

    #[serde(rename = "houseNumber")]
    pub house_number: String,

    /// Legacy alias of `houseNumber`.
    pub casa: String,

    pub condominio: String,

    pub visitante: String,

    pub residente: String,

    #[serde(rename = "createdAt")]
    pub created_at: String,

    #[serde(rename = "expiresAt")]
    pub expires_at: String,

    /// Legacy alias of `createdAt`.
    pub timestamp: String,

    #[serde(rename = "isUsed")]
    pub is_used: bool,

    pub estado: String,
}

impl From<QrCodeRecord> for CodeData {
    fn from(record: QrCodeRecord) -> Self {
        let created_at = record.created_at.to_string();

        Self {
            codigo: record.code.clone(),
            code: record.code,
            casa: record.house_number.clone(),
            house_number: record.house_number,
            condominio: record.condominium,
            visitante: record.visitor_name,
            residente: record.resident_name,
            timestamp: created_at.clone(),
            created_at,
            expires_at: record.expires_at.to_string(),
            is_used: record.is_used,
            estado: record.status.as_str().to_string(),
        }
    }
}

/// Register Code Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterCodeResponse {
    pub success: bool,
    pub data: CodeData,
}

/// Register Code Handler
#[endpoint(
    tags("codes"),
    summary = "Issue a QR code",
    responses(
        (status_code = StatusCode::OK, description = "Code issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<RegisterCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.house_number.trim().is_empty() || request.condominio.trim().is_empty() {
        return Err(StatusError::bad_request()
            .brief("Faltan datos requeridos: houseNumber, condominio"));
    }

    let record = state
        .app
        .access_codes
        .register(NewQrCode {
            house_number: request.house_number,
            condominium: request.condominio,
            visitor_name: request.visitante.unwrap_or_default(),
            resident_name: request.residente.unwrap_or_default(),
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(RegisterCodeResponse {
        success: true,
        data: record.into(),
    }))
}
