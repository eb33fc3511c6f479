//! Shoplite API - a small CRUD backend over SQLite.
//!
//! This binary serves the JSON API on port 8080 (configurable).
//!
//! # Architecture
//!
//! - Axum web framework
//! - A single SQLite session owned by [`Store`] (no pool)
//! - A sequential chain ordering the startup stages: connect → initialize →
//!   [seed] → listen. A failed stage logs its name and aborts startup.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use futures::FutureExt;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shoplite_api::config::ApiConfig;
use shoplite_api::db::seed::seed_demo_data;
use shoplite_api::db::{Store, StoreError};
use shoplite_api::routes;
use shoplite_api::state::AppState;
use shoplite_chain::{Chain, ChainError};

/// Errors that can abort a startup stage.
#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Init(#[from] ChainError<StoreError>),

    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shoplite_api=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build application state around a not-yet-connected store; the startup
    // chain below opens the session before the server starts serving.
    let state = AppState::new(config, Store::new());

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Startup stages, strictly in order, aborting on the first failure.
    // Chain results are homogeneous unit values, so the bound listener
    // escapes through a slot instead.
    let listener_slot = Mutex::new(None);

    let mut startup = Chain::new()
        .step("connect", |_| {
            let store = state.store();
            let url = state.config().database_url.clone();
            async move { store.connect(&url).await.map_err(StartupError::from) }.boxed()
        })
        .step("initialize", |_| {
            let store = state.store();
            async move { store.initialize().await.map_err(StartupError::from) }.boxed()
        });
    if state.config().seed {
        startup = startup.step("seed", |_| {
            let store = state.store();
            async move { seed_demo_data(store).await.map_err(StartupError::from) }.boxed()
        });
    }
    let startup = startup.step("listen", |_| {
        let addr = state.config().socket_addr();
        let slot = &listener_slot;
        async move {
            let listener = TcpListener::bind(addr).await?;
            *slot.lock().expect("listener slot poisoned") = Some(listener);
            Ok(())
        }
        .boxed()
    });

    if let Err(err) = startup.run().await {
        tracing::error!(stage = %err.step, error = %err.source, "startup failed");
        std::process::exit(1);
    }

    let listener = listener_slot
        .lock()
        .expect("listener slot poisoned")
        .take()
        .expect("listener missing after startup");
    let addr = listener
        .local_addr()
        .expect("listener has no local address");
    tracing::info!("api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
