//! 商品路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/products | GET | 缓存商品 (`?category=12&search=noodle`) |
//! | /api/products/refresh | POST | 重新拉取商品和分类 |
//! | /api/products/{id} | GET | 单个商品 |
//! | /api/products/{id}/price | PUT | 修改原价/促销价 |
//! | /api/products/{id}/stock | PUT | 修改库存 |
//! | /api/products/{id}/status | PUT | 上架/下架 |
//! | /api/categories | GET | 分类 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::StationState;

pub fn router() -> Router<StationState> {
    Router::new()
        .nest("/api/products", product_routes())
        .route("/api/categories", get(handler::categories))
}

fn product_routes() -> Router<StationState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/refresh", post(handler::refresh))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/price", put(handler::update_price))
        .route("/{id}/stock", put(handler::update_stock))
        .route("/{id}/status", put(handler::set_status))
}
