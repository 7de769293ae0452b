//! Orders service.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::services::error::{ServiceError, ServiceResult};
use crate::services::health;
use crate::services::store::{Collection, Document};

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: String,
    /// Product id → quantity.
    #[serde(default)]
    pub products: BTreeMap<String, u32>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl Document for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Clone, Default)]
pub struct OrdersState {
    pub orders: Arc<Collection<Order>>,
}

/// Routes of the orders service.
pub fn router(state: OrdersState) -> Router {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/{id}", get(get_order).patch(update_order))
        .route("/health", get(health))
        .with_state(state)
}

async fn create_order(
    State(state): State<OrdersState>,
    payload: Result<Json<Order>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<Order>)> {
    let Json(order) = payload?;
    let order = state.orders.insert(order)?;
    tracing::info!(order_id = %order.id, items = order.products.len(), "Order created");
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(
    State(state): State<OrdersState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Order>> {
    state
        .orders
        .get(&id)
        .map(Json)
        .ok_or(ServiceError::NotFound("Order not found"))
}

async fn update_order(
    State(state): State<OrdersState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ServiceResult<Json<Order>> {
    let Json(update) = payload?;
    let order = state
        .orders
        .update(&id, |order| order.status = update.status)
        .ok_or(ServiceError::NotFound("Order not found"))?;
    tracing::info!(order_id = %order.id, status = %order.status, "Order status changed");
    Ok(Json(order))
}

async fn list_orders(State(state): State<OrdersState>) -> Json<Vec<Order>> {
    Json(state.orders.list())
}
