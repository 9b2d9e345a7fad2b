//! Validate Code Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use aldaba_app::domain::access_codes::records::ValidationOutcome;

use crate::{codes::errors::into_status_error, extensions::*, state::State};

/// Validate Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateCodeRequest {
    pub code: String,
}

/// Validation verdict as shown on the gate device. Context fields are absent
/// for unknown codes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidationData {
    pub valid: bool,

    pub estado: String,

    pub message: String,

    #[serde(rename = "houseNumber", default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casa: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condominio: Option<String>,

    #[serde(rename = "expiresAt", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<ValidationOutcome> for ValidationData {
    fn from(outcome: ValidationOutcome) -> Self {
        let verdict = outcome.verdict;
        let context = outcome.context;

        Self {
            valid: verdict.is_valid(),
            estado: verdict.estado().to_string(),
            message: verdict.message().to_string(),
            house_number: context.as_ref().map(|c| c.house_number.clone()),
            casa: context.as_ref().map(|c| c.house_number.clone()),
            condominio: context.as_ref().map(|c| c.condominium.clone()),
            expires_at: context.as_ref().map(|c| c.expires_at.to_string()),
            timestamp: context.as_ref().map(|c| c.created_at.to_string()),
        }
    }
}

/// Validate Code Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateCodeResponse {
    pub success: bool,
    pub data: ValidationData,
}

/// Validate Code Handler
///
/// Always answers 200; the verdict travels in `data.valid` / `data.estado`.
#[endpoint(
    tags("codes"),
    summary = "Validate a QR code at the gate",
    responses(
        (status_code = StatusCode::OK, description = "Verdict produced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<ValidateCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.code.trim().is_empty() {
        return Err(StatusError::bad_request().brief("Código QR requerido"));
    }

    let outcome = state
        .app
        .access_codes
        .validate(&request.code)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ValidateCodeResponse {
        success: true,
        data: outcome.into(),
    }))
}

#[cfg(test)]
mod tests {
    use aldaba::lifecycle::Verdict;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use aldaba_app::domain::access_codes::{
        MockAccessCodesService, records::ValidationContext,
    };

    use crate::test_helpers::codes_service;

    use super::*;

    fn make_service(codes: MockAccessCodesService) -> Service {
        codes_service(codes, Router::with_path("api/validate-qr").post(handler))
    }

    fn context() -> Result<ValidationContext, jiff::Error> {
        Ok(ValidationContext {
            house_number: "42".to_string(),
            condominium: "Los Pinos".to_string(),
            created_at: "2026-08-07T10:00:00Z".parse()?,
            expires_at: "2026-08-08T10:00:00Z".parse()?,
        })
    }

    #[tokio::test]
    async fn test_granted_code_reports_valido() -> TestResult {
        let mut codes = MockAccessCodesService::new();
        let ctx = context()?;

        codes
            .expect_validate()
            .once()
            .withf(|code| code == "QR-1-42-abc")
            .return_once(move |_| {
                Ok(ValidationOutcome {
                    verdict: Verdict::Granted,
                    context: Some(ctx),
                })
            });

        let mut res = TestClient::post("http://example.com/api/validate-qr")
            .json(&json!({ "code": "QR-1-42-abc" }))
            .send(&make_service(codes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ValidateCodeResponse = res.take_json().await?;

        assert!(body.data.valid);
        assert_eq!(body.data.estado, "valido");
        assert_eq!(body.data.message, "Código QR válido");
        assert_eq!(body.data.house_number.as_deref(), Some("42"));
        assert_eq!(body.data.condominio.as_deref(), Some("Los Pinos"));

        Ok(())
    }

    #[tokio::test]
    async fn test_spent_code_reports_usado() -> TestResult {
        let mut codes = MockAccessCodesService::new();
        let ctx = context()?;

        codes.expect_validate().once().return_once(move |_| {
            Ok(ValidationOutcome {
                verdict: Verdict::AlreadyUsed,
                context: Some(ctx),
            })
        });

        let mut res = TestClient::post("http://example.com/api/validate-qr")
            .json(&json!({ "code": "QR-1-42-abc" }))
            .send(&make_service(codes))
            .await;

        let body: ValidateCodeResponse = res.take_json().await?;

        assert!(!body.data.valid);
        assert_eq!(body.data.estado, "usado");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_code_still_answers_200() -> TestResult {
        let mut codes = MockAccessCodesService::new();

        codes.expect_validate().once().return_once(|_| {
            Ok(ValidationOutcome {
                verdict: Verdict::Unknown,
                context: None,
            })
        });

        let mut res = TestClient::post("http://example.com/api/validate-qr")
            .json(&json!({ "code": "nope" }))
            .send(&make_service(codes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ValidateCodeResponse = res.take_json().await?;

        assert!(!body.data.valid);
        assert_eq!(body.data.estado, "invalido");
        assert!(body.data.house_number.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_code_returns_400() -> TestResult {
        let mut codes = MockAccessCodesService::new();

        codes.expect_validate().never();

        let res = TestClient::post("http://example.com/api/validate-qr")
            .json(&json!({ "code": "" }))
            .send(&make_service(codes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
