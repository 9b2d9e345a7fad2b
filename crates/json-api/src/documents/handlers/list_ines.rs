//! List INEs Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    documents::{errors::into_status_error, register_ine::IneData},
    extensions::*,
    state::State,
};

/// List INEs Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ListInesResponse {
    pub success: bool,
    pub data: Vec<IneData>,
}

/// List INEs Handler
///
/// Returns active INE records for a house, newest first.
#[endpoint(
    tags("documents"),
    summary = "Active INE records for a house",
    responses(
        (status_code = StatusCode::OK, description = "Records returned"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ListInesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let missing =
        || StatusError::bad_request().brief("Parámetros requeridos: houseNumber, condominio");

    let house_number = req.query::<String>("houseNumber").ok_or_else(missing)?;
    let condominio = req.query::<String>("condominio").ok_or_else(missing)?;

    let records = state
        .app
        .documents
        .list_ines(&house_number, &condominio)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ListInesResponse {
        success: true,
        data: records.into_iter().map(Into::into).collect(),
    }))
}
