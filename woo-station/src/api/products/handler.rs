//! Product API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::dto::{CategoryDto, ProductDto};

use crate::core::StationState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<u64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub regular_price: String,
    /// Blank clears the sale price; absent leaves it unchanged
    pub sale_price: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub products: usize,
}

/// GET /api/products
pub async fn list(
    State(state): State<StationState>,
    Query(query): Query<ListQuery>,
) -> Json<AppResponse<Vec<ProductDto>>> {
    ok(state.products.list(query.category, query.search.as_deref()))
}

/// GET /api/categories
pub async fn categories(State(state): State<StationState>) -> Json<AppResponse<Vec<CategoryDto>>> {
    ok(state.products.categories())
}

/// POST /api/products/refresh
pub async fn refresh(
    State(state): State<StationState>,
) -> AppResult<Json<AppResponse<RefreshResponse>>> {
    let products = state.products.refresh().await?;
    Ok(ok(RefreshResponse { products }))
}

/// GET /api/products/{id} - cache only
pub async fn get_by_id(
    State(state): State<StationState>,
    Path(id): Path<u64>,
) -> AppResult<Json<AppResponse<ProductDto>>> {
    state
        .products
        .get(id)
        .map(ok)
        .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))
}

/// PUT /api/products/{id}/price
pub async fn update_price(
    State(state): State<StationState>,
    Path(id): Path<u64>,
    Json(req): Json<PriceRequest>,
) -> AppResult<Json<AppResponse<ProductDto>>> {
    let product = state
        .products
        .update_price(id, &req.regular_price, req.sale_price.as_deref())
        .await?;
    Ok(ok(product))
}

/// PUT /api/products/{id}/stock
pub async fn update_stock(
    State(state): State<StationState>,
    Path(id): Path<u64>,
    Json(req): Json<StockRequest>,
) -> AppResult<Json<AppResponse<ProductDto>>> {
    Ok(ok(state.products.update_stock(id, req.quantity).await?))
}

/// PUT /api/products/{id}/status - publish, draft, pending or private
pub async fn set_status(
    State(state): State<StationState>,
    Path(id): Path<u64>,
    Json(req): Json<StatusRequest>,
) -> AppResult<Json<AppResponse<ProductDto>>> {
    Ok(ok(state.products.set_status(id, &req.status).await?))
}
