//! Admin auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::warn;

use crate::state::State;

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());

            return;
        }
    };

    let Some(admin_token) = state.admin_token.as_ref() else {
        warn!("admin endpoint hit but no admin token is configured");

        res.render(StatusError::unauthorized().brief("Admin access disabled"));

        return;
    };

    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));

        return;
    };

    if !admin_token.matches(token) {
        res.render(StatusError::unauthorized().brief("Invalid admin token"));

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use aldaba_app::domain::access_codes::MockAccessCodesService;

    use crate::test_helpers::{service, state_with_admin, state_with_codes};

    use super::*;

    #[salvo::handler]
    async fn protected(res: &mut Response) {
        res.render("ok");
    }

    fn guarded_router() -> Router {
        Router::with_path("api/admin")
            .hoop(handler)
            .push(Router::with_path("ping").get(protected))
    }

    #[tokio::test]
    async fn test_missing_header_returns_401() -> TestResult {
        let state = state_with_admin(MockAccessCodesService::new(), "s3cret");

        let res = TestClient::get("http://example.com/api/admin/ping")
            .send(&service(state, guarded_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_token_returns_401() -> TestResult {
        let state = state_with_admin(MockAccessCodesService::new(), "s3cret");

        let res = TestClient::get("http://example.com/api/admin/ping")
            .add_header(AUTHORIZATION, "Bearer wrong", true)
            .send(&service(state, guarded_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_unconfigured_token_refuses_everyone() -> TestResult {
        let state = state_with_codes(MockAccessCodesService::new());

        let res = TestClient::get("http://example.com/api/admin/ping")
            .add_header(AUTHORIZATION, "Bearer anything", true)
            .send(&service(state, guarded_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_token_passes_through() -> TestResult {
        let state = state_with_admin(MockAccessCodesService::new(), "s3cret");

        let res = TestClient::get("http://example.com/api/admin/ping")
            .add_header(AUTHORIZATION, "Bearer s3cret", true)
            .send(&service(state, guarded_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
