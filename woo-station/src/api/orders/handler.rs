//! Order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderStatus};

use crate::core::StationState;
use crate::printing::TemplateType;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReprintQuery {
    /// Defaults to the configured template
    pub template: Option<TemplateType>,
}

#[derive(Debug, Serialize)]
pub struct PrintedResponse {
    pub printed: usize,
}

/// GET /api/orders - cached orders, newest first
pub async fn list(
    State(state): State<StationState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(OrderStatus::from);
    Ok(ok(state.orders.list(status.as_ref())?))
}

/// GET /api/orders/open
pub async fn list_open(State(state): State<StationState>) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    Ok(ok(state.orders.list_open()?))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<StationState>,
    Path(id): Path<u64>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.orders.get(id).await?))
}

/// POST /api/orders/{id}/refresh
pub async fn refresh(
    State(state): State<StationState>,
    Path(id): Path<u64>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.orders.refresh(id).await?))
}

/// PUT /api/orders/{id}/status - update WooCommerce first, then the cache
pub async fn update_status(
    State(state): State<StationState>,
    Path(id): Path<u64>,
    Json(req): Json<StatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let status = OrderStatus::from(req.status.as_str());
    Ok(ok(state.orders.update_status(id, status).await?))
}

/// POST /api/orders/{id}/reprint
pub async fn reprint(
    State(state): State<StationState>,
    Path(id): Path<u64>,
    Query(query): Query<ReprintQuery>,
) -> AppResult<Json<AppResponse<PrintedResponse>>> {
    state.orders.reprint(id, query.template).await?;
    Ok(ok(PrintedResponse { printed: 1 }))
}

/// POST /api/orders/print-pending
pub async fn print_pending(
    State(state): State<StationState>,
) -> AppResult<Json<AppResponse<PrintedResponse>>> {
    let printed = state.orders.print_pending().await?;
    Ok(ok(PrintedResponse { printed }))
}
