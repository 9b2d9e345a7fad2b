//! Bulk Reset Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{codes::errors::into_status_error, extensions::*, state::State};

/// Bulk Reset Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetCodesRequest {
    pub condominio: String,
}

/// Bulk Reset Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResetCodesResponse {
    pub success: bool,

    /// Number of codes removed.
    pub removed: u64,
}

/// Bulk Reset Handler
///
/// Deletes every code belonging to one condominium.
#[endpoint(
    tags("admin"),
    summary = "Bulk reset a condominium's codes",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Codes removed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ResetCodesRequest>,
    depot: &mut Depot,
) -> Result<Json<ResetCodesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.condominio.trim().is_empty() {
        return Err(StatusError::bad_request().brief("Condominio requerido"));
    }

    let removed = state
        .app
        .access_codes
        .reset(&request.condominio)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ResetCodesResponse {
        success: true,
        removed,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::{http::header::AUTHORIZATION, test::{ResponseExt, TestClient}};
    use serde_json::json;
    use testresult::TestResult;

    use aldaba_app::domain::access_codes::MockAccessCodesService;

    use crate::{
        admin::middleware,
        test_helpers::{service, state_with_admin},
    };

    use super::*;

    fn make_service(codes: MockAccessCodesService) -> Service {
        let router = Router::with_path("api/admin")
            .hoop(middleware::handler)
            .push(Router::with_path("reset-codes").post(handler));

        service(state_with_admin(codes, "s3cret"), router)
    }

    #[tokio::test]
    async fn test_reset_reports_removed_count() -> TestResult {
        let mut codes = MockAccessCodesService::new();

        codes
            .expect_reset()
            .once()
            .withf(|condominium| condominium == "Los Pinos")
            .return_once(|_| Ok(37));

        codes.expect_register().never();
        codes.expect_validate().never();

        let mut res = TestClient::post("http://example.com/api/admin/reset-codes")
            .add_header(AUTHORIZATION, "Bearer s3cret", true)
            .json(&json!({ "condominio": "Los Pinos" }))
            .send(&make_service(codes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ResetCodesResponse = res.take_json().await?;

        assert!(body.success);
        assert_eq!(body.removed, 37);

        Ok(())
    }

    #[tokio::test]
    async fn test_reset_without_token_returns_401() -> TestResult {
        let mut codes = MockAccessCodesService::new();

        codes.expect_reset().never();

        let res = TestClient::post("http://example.com/api/admin/reset-codes")
            .json(&json!({ "condominio": "Los Pinos" }))
            .send(&make_service(codes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
