//! Aldaba JSON API Server

use std::{process, sync::Arc, time::Duration};

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use aldaba_app::{
    context::AppContext,
    domain::reports::scheduler,
    integrations::keepalive,
};

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod codes;
mod config;
mod documents;
mod extensions;
mod healthcheck;
mod push_tokens;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Aldaba JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let app = match AppContext::from_config(config.app_config()).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    // Periodic activity reports, when mail is configured
    if let Some(mail) = app.mail.clone() {
        let every = Duration::from_secs(config.report_interval_hours.saturating_mul(60 * 60));

        scheduler::spawn(Arc::clone(&app.reports), mail, every);
    }

    // Self-ping keeping free-tier hosting awake
    if let Some(server_url) = config.server_url.clone() {
        keepalive::spawn(server_url);
    }

    let state = State::new(app, config.admin_token()).into_shared();

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("health").get(healthcheck::health))
        .push(
            Router::with_path("api")
                .push(Router::with_path("keep-alive").get(healthcheck::keep_alive))
                .push(
                    Router::with_path("register-push-token")
                        .post(push_tokens::register::handler),
                )
                .push(Router::with_path("register-code").post(codes::register::handler))
                .push(Router::with_path("validate-qr").post(codes::validate::handler))
                .push(Router::with_path("get-history").get(codes::history::handler))
                .push(
                    Router::with_path("counters")
                        .get(codes::counters::handler)
                        .post(codes::counters::handler),
                )
                .push(
                    Router::with_path("register-worker")
                        .post(documents::register_worker::handler),
                )
                .push(Router::with_path("register-ine").post(documents::register_ine::handler))
                .push(Router::with_path("get-ines").get(documents::list_ines::handler))
                .push(
                    Router::with_path("admin")
                        .hoop(admin::middleware::handler)
                        .push(
                            Router::with_path("reset-codes").post(admin::reset_codes::handler),
                        ),
                ),
        );

    let doc = OpenApi::new("Aldaba API", "0.3.0")
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(signal_error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {signal_error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
