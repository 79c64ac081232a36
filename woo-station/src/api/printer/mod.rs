//! 打印机路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/printer/test-page | POST | 打印测试页 |

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;

use crate::core::StationState;
use crate::utils::{AppResponse, AppResult, ok};

pub fn router() -> Router<StationState> {
    Router::new().route("/api/printer/test-page", post(test_page))
}

#[derive(Debug, Serialize)]
pub struct TestPageResponse {
    pub printer: Option<String>,
}

pub async fn test_page(
    State(state): State<StationState>,
) -> AppResult<Json<AppResponse<TestPageResponse>>> {
    state.orders.print_test_page().await?;
    Ok(ok(TestPageResponse {
        printer: state.executor.as_ref().map(|e| e.target()),
    }))
}
