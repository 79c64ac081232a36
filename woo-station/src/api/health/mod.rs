//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 版本、打印机和订单缓存状态 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::{StationError, StationState};
use crate::utils::AppResult;

pub fn router() -> Router<StationState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// 打印机地址 (未配置时为空)
    #[serde(skip_serializing_if = "Option::is_none")]
    printer: Option<String>,
    cached_orders: u64,
    unprinted_orders: usize,
}

pub async fn health(State(state): State<StationState>) -> AppResult<Json<HealthResponse>> {
    let cached_orders = state.store.order_count().map_err(StationError::from)?;
    let unprinted_orders = state
        .store
        .unprinted_orders()
        .map_err(StationError::from)?
        .len();

    Ok(Json(HealthResponse {
        status: if state.executor.is_some() { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        printer: state.executor.as_ref().map(|e| e.target()),
        cached_orders,
        unprinted_orders,
    }))
}
