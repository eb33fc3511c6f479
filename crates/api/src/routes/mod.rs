//! HTTP route handlers for the Shoplite API.
//!
//! # Route Structure
//!
//! ```text
//! # Listings (optional ?page=N, zero-based, 20 rows per page)
//! GET  /products          - Product listing
//! GET  /orders            - Order listing
//! GET  /lineItems         - Line item listing
//! GET  /shops             - Shop listing
//!
//! # Single entities (404 when the id does not exist)
//! GET  /product/{id}      - One product
//! GET  /order/{id}        - One order
//! GET  /shop/{id}         - One shop
//!
//! # Creation (JSON bodies, camelCase keys)
//! POST /product           - name, price, shopId: create product, link to shop
//! POST /order             - shopId: create order, link to shop
//! POST /lineItem          - productId, orderId, quantity
//! POST /shop              - name
//! ```
//!
//! The two create-and-link endpoints run their steps through a
//! [`shoplite_chain::Chain`] and respond with the chain's results mapping
//! (`{"product": id, "link": rowid}`); constraint violations such as a
//! dangling `shopId` or a duplicate shop name map to 409.

pub mod line_items;
pub mod orders;
pub mod products;
pub mod shops;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Pagination query parameters for the listing routes.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    /// The requested page, defaulting to the first.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0)
    }
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Listings
        .route("/products", get(products::index))
        .route("/orders", get(orders::index))
        .route("/lineItems", get(line_items::index))
        .route("/shops", get(shops::index))
        // Single entities
        .route("/product/{id}", get(products::show))
        .route("/order/{id}", get(orders::show))
        .route("/shop/{id}", get(shops::show))
        // Creation
        .route("/product", post(products::create))
        .route("/order", post(orders::create))
        .route("/lineItem", post(line_items::create))
        .route("/shop", post(shops::create))
}
