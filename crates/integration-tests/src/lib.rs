//! Integration tests for Shoplite.
//!
//! The tests run fully in-process: each builds the axum router against a
//! fresh in-memory SQLite store and drives it with
//! `tower::ServiceExt::oneshot`, so no server or external database is
//! required.
//!
//! # Test Categories
//!
//! - `http_api` - The JSON route table, status mapping, and pagination
//! - `store_flow` - End-to-end flows against the store and chain directly

use axum::Router;

use shoplite_api::config::ApiConfig;
use shoplite_api::db::Store;
use shoplite_api::routes;
use shoplite_api::state::AppState;

/// Build the full router against a fresh in-memory store.
///
/// # Panics
///
/// Panics when the in-memory store cannot be opened or initialized.
pub async fn test_app() -> Router {
    let store = connected_store().await;

    let config = ApiConfig {
        database_url: "sqlite::memory:".to_string(),
        host: std::net::Ipv4Addr::LOCALHOST.into(),
        port: 0,
        seed: false,
    };

    routes::routes().with_state(AppState::new(config, store))
}

/// Open and initialize a fresh in-memory store.
///
/// # Panics
///
/// Panics when the in-memory store cannot be opened or initialized.
pub async fn connected_store() -> Store {
    let store = Store::new();
    store
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store");
    store
        .initialize()
        .await
        .expect("Failed to initialize schema");
    store
}
