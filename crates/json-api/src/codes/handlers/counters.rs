//! Daily Counters Handler

use std::sync::Arc;

use aldaba::counters::utc_day_start;
use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{codes::errors::into_status_error, extensions::*, state::State};

/// Daily tallies; Spanish and English keys carry the same values for older
/// guard-station builds.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CountersData {
    pub generados: i64,
    pub avalados: i64,
    pub negados: i64,
    pub generated: i64,
    pub validated: i64,
    pub denied: i64,
    pub date: String,
}

/// Counters Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CountersResponse {
    pub success: bool,
    pub data: CountersData,
}

/// Daily Counters Handler
///
/// Mounted on both GET and POST for client compatibility.
#[endpoint(
    tags("codes"),
    summary = "Daily gate counters",
    responses(
        (status_code = StatusCode::OK, description = "Counters returned"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CountersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let counters = state
        .app
        .access_codes
        .daily_counters()
        .await
        .map_err(into_status_error)?;

    let date = utc_day_start(Timestamp::now())
        .or_500("failed to compute counter day")?
        .to_string();

    Ok(Json(CountersResponse {
        success: true,
        data: CountersData {
            generados: counters.generated,
            avalados: counters.validated,
            negados: counters.denied,
            generated: counters.generated,
            validated: counters.validated,
            denied: counters.denied,
            date,
        },
    }))
}
