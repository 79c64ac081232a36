//! 订单路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | GET | 缓存订单 (`?status=processing`) |
//! | /api/orders/open | GET | 未完成订单 |
//! | /api/orders/print-pending | POST | 补打所有未打印订单 |
//! | /api/orders/{id} | GET | 单个订单 (缓存没有时从商店拉取) |
//! | /api/orders/{id}/refresh | POST | 从商店重新拉取 |
//! | /api/orders/{id}/status | PUT | 修改订单状态 |
//! | /api/orders/{id}/reprint | POST | 补打 (`?template=kitchen`) |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::StationState;

pub fn router() -> Router<StationState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<StationState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/open", get(handler::list_open))
        .route("/print-pending", post(handler::print_pending))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/refresh", post(handler::refresh))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/reprint", post(handler::reprint))
}
