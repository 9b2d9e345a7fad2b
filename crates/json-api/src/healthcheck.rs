//! Aldaba JSON API health and keep-alive handlers

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,

    /// Service status
    pub status: String,

    /// Current server time
    pub timestamp: String,

    /// Seconds since the server started
    pub uptime: u64,

    /// Database connectivity flag
    pub database: String,
}

/// Healthcheck handler
///
/// Returns service health status
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn health(depot: &mut Depot) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
        timestamp: Timestamp::now().to_string(),
        uptime: state.started_at.elapsed().as_secs(),
        database: "connected".to_string(),
    }))
}

/// Keep-alive response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct KeepAliveResponse {
    pub success: bool,

    /// Liveness message
    pub message: String,

    /// Current server time
    pub timestamp: String,

    /// Seconds since the server started
    pub uptime: u64,
}

/// Keep-alive handler, the target of the self-ping loop.
#[endpoint(tags("health"), summary = "Keep-alive endpoint")]
pub(crate) async fn keep_alive(depot: &mut Depot) -> Result<Json<KeepAliveResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(KeepAliveResponse {
        success: true,
        message: "Server is alive".to_string(),
        timestamp: Timestamp::now().to_string(),
        uptime: state.started_at.elapsed().as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{service, state_with_nothing};

    use super::*;

    #[tokio::test]
    async fn test_healthcheck() -> TestResult {
        let router = Router::with_path("health").get(health);

        let response: HealthResponse =
            TestClient::get("http://example.com/health")
                .send(&service(state_with_nothing(), router))
                .await
                .take_json()
                .await?;

        assert!(response.success);
        assert_eq!(response.status, "ok");
        assert_eq!(response.database, "connected");

        Ok(())
    }

    #[tokio::test]
    async fn test_keep_alive() -> TestResult {
        let router = Router::with_path("api/keep-alive").get(keep_alive);

        let response: KeepAliveResponse =
            TestClient::get("http://example.com/api/keep-alive")
                .send(&service(state_with_nothing(), router))
                .await
                .take_json()
                .await?;

        assert!(response.success);
        assert_eq!(response.message, "Server is alive");

        Ok(())
    }
}
