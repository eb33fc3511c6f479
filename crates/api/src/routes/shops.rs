//! Shop route handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Created, Shop};
use crate::routes::PageQuery;
use crate::state::AppState;

/// Request body for creating a shop.
#[derive(Debug, Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
}

/// List the requested page of shops.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Shop>>> {
    let rows = state.store().list_shops(query.page()).await?;
    Ok(Json(rows.into_iter().map(Shop::from).collect()))
}

/// Fetch a single shop by id.
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Shop>> {
    let row = state
        .store()
        .get_shop(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("shop {id}")))?;
    Ok(Json(Shop::from(row)))
}

/// Create a shop with a globally unique name.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateShopRequest>,
) -> Result<Json<Created>> {
    let id = state.store().create_shop(&req.name).await?;
    Ok(Json(Created { id }))
}
