//! Code History Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    codes::{errors::into_status_error, register::CodeData},
    extensions::*,
    state::State,
};

/// Code History Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HistoryResponse {
    pub success: bool,
    pub data: Vec<CodeData>,
}

/// Code History Handler
///
/// Returns the most recent codes for a house, newest first.
#[endpoint(
    tags("codes"),
    summary = "Code history for a house",
    responses(
        (status_code = StatusCode::OK, description = "History returned"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<HistoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let (house_number, condominio) = required_query(req)?;

    let records = state
        .app
        .access_codes
        .history(&house_number, &condominio)
        .await
        .map_err(into_status_error)?;

    Ok(Json(HistoryResponse {
        success: true,
        data: records.into_iter().map(Into::into).collect(),
    }))
}

fn required_query(req: &mut Request) -> Result<(String, String), StatusError> {
    let missing =
        || StatusError::bad_request().brief("Parámetros requeridos: houseNumber, condominio");

    let house_number = req.query::<String>("houseNumber").ok_or_else(missing)?;
    let condominio = req.query::<String>("condominio").ok_or_else(missing)?;

    Ok((house_number, condominio))
}
