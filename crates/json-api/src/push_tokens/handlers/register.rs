//! Register Push Token Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use aldaba_app::{
    domain::push_tokens::data::NewPushToken, integrations::push::is_expo_push_token,
};

use crate::{extensions::*, push_tokens::errors::into_status_error, state::State};

/// Register Push Token Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterPushTokenRequest {
    #[serde(rename = "houseNumber")]
    pub house_number: String,

    pub condominio: String,

    #[serde(rename = "pushToken")]
    pub push_token: String,

    pub platform: String,
}

/// Register Push Token Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterPushTokenResponse {
    pub success: bool,
    pub message: String,
    pub upserted: bool,
    pub modified: bool,
}

/// Register Push Token Handler
///
/// One active token per (house, condominium) pair; re-registration replaces
/// the stored token.
#[endpoint(
    tags("push-tokens"),
    summary = "Register a device push token",
    responses(
        (status_code = StatusCode::OK, description = "Token stored"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterPushTokenRequest>,
    depot: &mut Depot,
) -> Result<Json<RegisterPushTokenResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.house_number.trim().is_empty()
        || request.condominio.trim().is_empty()
        || request.platform.trim().is_empty()
    {
        return Err(StatusError::bad_request().brief(
            "Faltan datos requeridos: houseNumber, condominio, pushToken, platform",
        ));
    }

    if !is_expo_push_token(&request.push_token) {
        return Err(StatusError::bad_request()
            .brief("Token inválido. Debe ser un Expo Push Token válido"));
    }

    let upsert = state
        .app
        .push_tokens
        .upsert(NewPushToken {
            house_number: request.house_number,
            condominium: request.condominio,
            push_token: request.push_token,
            platform: request.platform,
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(RegisterPushTokenResponse {
        success: true,
        message: "Token registrado correctamente".to_string(),
        upserted: upsert.inserted,
        modified: !upsert.inserted,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use aldaba_app::domain::push_tokens::MockPushTokensService;

    use crate::test_helpers::{make_push_token_upsert, push_tokens_service};

    use super::*;

    fn make_service(push_tokens: MockPushTokensService) -> Service {
        push_tokens_service(
            push_tokens,
            Router::with_path("api/register-push-token").post(handler),
        )
    }

    #[tokio::test]
    async fn test_first_registration_reports_upserted() -> TestResult {
        let mut push_tokens = MockPushTokensService::new();

        push_tokens
            .expect_upsert()
            .once()
            .withf(|new| {
                new.house_number == "42"
                    && new.condominium == "Los Pinos"
                    && new.push_token == "ExponentPushToken[abc]"
                    && new.platform == "android"
            })
            .return_once(|new| Ok(make_push_token_upsert(new, true)));

        push_tokens.expect_find().never();

        let mut res = TestClient::post("http://example.com/api/register-push-token")
            .json(&json!({
                "houseNumber": "42",
                "condominio": "Los Pinos",
                "pushToken": "ExponentPushToken[abc]",
                "platform": "android",
            }))
            .send(&make_service(push_tokens))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: RegisterPushTokenResponse = res.take_json().await?;

        assert!(body.upserted);
        assert!(!body.modified);

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_reports_modified() -> TestResult {
        let mut push_tokens = MockPushTokensService::new();

        push_tokens
            .expect_upsert()
            .once()
            .return_once(|new| Ok(make_push_token_upsert(new, false)));

        let mut res = TestClient::post("http://example.com/api/register-push-token")
            .json(&json!({
                "houseNumber": "42",
                "condominio": "Los Pinos",
                "pushToken": "ExponentPushToken[abc]",
                "platform": "ios",
            }))
            .send(&make_service(push_tokens))
            .await;

        let body: RegisterPushTokenResponse = res.take_json().await?;

        assert!(!body.upserted);
        assert!(body.modified);

        Ok(())
    }

    #[tokio::test]
    async fn test_non_expo_token_returns_400() -> TestResult {
        let mut push_tokens = MockPushTokensService::new();

        push_tokens.expect_upsert().never();

        let res = TestClient::post("http://example.com/api/register-push-token")
            .json(&json!({
                "houseNumber": "42",
                "condominio": "Los Pinos",
                "pushToken": "fcm:not-an-expo-token",
                "platform": "android",
            }))
            .send(&make_service(push_tokens))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_field_returns_400() -> TestResult {
        let mut push_tokens = MockPushTokensService::new();

        push_tokens.expect_upsert().never();

        let res = TestClient::post("http://example.com/api/register-push-token")
            .json(&json!({ "houseNumber": "42", "condominio": "Los Pinos" }))
            .send(&make_service(push_tokens))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
