//! Product route handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use futures::FutureExt;
use serde::Deserialize;

use shoplite_chain::{Chain, StepResults};

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::routes::PageQuery;
use crate::state::AppState;

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub price: i64,
    pub shop_id: i64,
}

/// List the requested page of products.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Product>>> {
    let rows = state.store().list_products(query.page()).await?;
    Ok(Json(rows.into_iter().map(Product::from).collect()))
}

/// Fetch a single product by id.
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Product>> {
    let row = state
        .store()
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(Product::from(row)))
}

/// Create a product and link it to a shop.
///
/// Responds with the chain's results mapping: the new product id under
/// `product` and the association rowid under `link`.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<StepResults<i64>>> {
    let store = state.store();

    let results = Chain::new()
        .step("product", |_| {
            store.create_product(&req.name, req.price).boxed()
        })
        .step("link", |done| {
            let product_id = done["product"];
            store.add_product_to_shop(req.shop_id, product_id).boxed()
        })
        .run()
        .await?;

    Ok(Json(results))
}
