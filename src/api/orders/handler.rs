//! Order API Handlers
//!
//! POST delegates to the placement service, which owns the atomic
//! validate / duplicate-check / reserve / persist workflow. The other
//! handlers are plain CRUD over the order table.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::models::{Order, OrderDraft};
use crate::db::repository::OrderRepository;
use crate::orders::validate_order_input;
use crate::utils::{AppError, AppResult};

/// GET /api/orders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found."))?;
    Ok(Json(order))
}

/// POST /api/orders - place an order atomically
pub async fn place(
    State(state): State<ServerState>,
    Json(draft): Json<OrderDraft>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.placement.place_order(&draft).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PATCH /api/orders/{id} - partial update, no stock side effects
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(draft): Json<OrderDraft>,
) -> AppResult<Json<Order>> {
    let errors = validate_order_input(&draft, false);
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let repo = OrderRepository::new(state.db.clone());
    match repo.update(&id, draft).await {
        Ok(order) => Ok(Json(order)),
        Err(crate::db::repository::RepoError::NotFound(_)) => {
            Err(AppError::not_found("Order not found."))
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = OrderRepository::new(state.db.clone());
    match repo.delete(&id).await {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "message": "Order deleted successfully."
        }))),
        Err(crate::db::repository::RepoError::NotFound(_)) => {
            Err(AppError::not_found("Order not found."))
        }
        Err(e) => Err(e.into()),
    }
}
