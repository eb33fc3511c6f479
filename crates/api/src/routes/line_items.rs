//! Line item route handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Created, LineItem};
use crate::routes::PageQuery;
use crate::state::AppState;

/// Request body for creating a line item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineItemRequest {
    pub product_id: i64,
    pub order_id: i64,
    pub quantity: i64,
}

/// List the requested page of line items.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<LineItem>>> {
    let rows = state.store().list_line_items(query.page()).await?;
    Ok(Json(rows.into_iter().map(LineItem::from).collect()))
}

/// Create a line item for an existing product and order.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateLineItemRequest>,
) -> Result<Json<Created>> {
    let id = state
        .store()
        .create_line_item(req.product_id, req.order_id, req.quantity)
        .await?;
    Ok(Json(Created { id }))
}
