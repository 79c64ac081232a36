//! API 路由模块
//!
//! 店员端通过这些接口查看订单、修改状态、补打小票和维护商品。
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单查询、状态修改、补打
//! - [`products`] - 商品和分类缓存、价格/库存/上架状态
//! - [`printer`] - 打印机测试页

pub mod health;
pub mod orders;
pub mod printer;
pub mod products;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::StationState;

/// 所有接口路由 (未绑定状态)
pub fn build_app() -> Router<StationState> {
    Router::<StationState>::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(printer::router())
}

/// 绑定状态并加上 CORS 和请求追踪
pub fn router(state: StationState) -> Router {
    build_app()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
