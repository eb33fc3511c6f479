//! Order route handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use futures::FutureExt;
use serde::Deserialize;

use shoplite_chain::{Chain, StepResults};

use crate::error::{AppError, Result};
use crate::models::Order;
use crate::routes::PageQuery;
use crate::state::AppState;

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shop_id: i64,
}

/// List the requested page of orders.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Order>>> {
    let rows = state.store().list_orders(query.page()).await?;
    Ok(Json(rows.into_iter().map(Order::from).collect()))
}

/// Fetch a single order by id.
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Order>> {
    let row = state
        .store()
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    Ok(Json(Order::from(row)))
}

/// Create an order and link it to a shop.
///
/// Responds with the chain's results mapping: the new order id under
/// `order` and the association rowid under `link`.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<StepResults<i64>>> {
    let store = state.store();

    let results = Chain::new()
        .step("order", |_| store.create_order().boxed())
        .step("link", |done| {
            let order_id = done["order"];
            store.add_order_to_shop(req.shop_id, order_id).boxed()
        })
        .run()
        .await?;

    Ok(Json(results))
}
