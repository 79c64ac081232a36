//! HTTP API 错误处理
//!
//! - [`AppError`] - 接口错误，带 HTTP 状态码和错误码
//! - [`AppResponse`] - 统一响应结构
//!
//! # 错误码
//!
//! | 错误码 | HTTP | 说明 |
//! |--------|------|------|
//! | E0000 | 200 | 成功 |
//! | E0002 | 400 | 参数校验失败 |
//! | E0003 | 404 | 资源不存在 |
//! | E0004 | 409 | 订单正在打印 |
//! | E9001 | 500 | 内部错误 |
//! | E9003 | 502 | WooCommerce 请求失败 |
//! | E9004 | 503 | 打印机不可用 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use woo_client::ClientError;
use woo_printer::PrintError;

use crate::core::StationError;
use crate::orders::StoreError;
use crate::printing::PrintJobError;

/// API 统一响应结构
///
/// ```json
/// { "code": "E0000", "message": "Success", "data": { ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 资源不存在 (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 参数校验失败 (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 同一订单正在打印 (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// WooCommerce 返回错误或无法连接 (502)
    #[error("Store request failed: {0}")]
    Upstream(String),

    /// 未配置打印机或打印失败 (503)
    #[error("Printer unavailable: {0}")]
    Printer(String),

    /// 内部错误 (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),
            AppError::Upstream(msg) => {
                error!(target: "upstream", error = %msg, "WooCommerce request failed");
                (StatusCode::BAD_GATEWAY, "E9003", msg.as_str())
            }
            AppError::Printer(msg) => {
                error!(target: "printer", error = %msg, "Print request failed");
                (StatusCode::SERVICE_UNAVAILABLE, "E9004", msg.as_str())
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });
        (status, body).into_response()
    }
}

impl From<StationError> for AppError {
    fn from(e: StationError) -> Self {
        match e {
            StationError::NotFound(msg) => AppError::NotFound(msg),
            StationError::Validation(msg) => AppError::Validation(msg),
            // 唯一的运行时配置错误是未配置打印机
            StationError::Config(msg) => AppError::Printer(msg),
            StationError::Client(e) => e.into(),
            StationError::Store(StoreError::OrderNotFound(id)) => {
                AppError::NotFound(format!("Order {}", id))
            }
            StationError::Store(e) => AppError::Internal(e.to_string()),
            StationError::Print(e) => e.into(),
            StationError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::NotFound(msg) => AppError::NotFound(msg),
            ClientError::Validation(msg) => AppError::Validation(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<PrintJobError> for AppError {
    fn from(e: PrintJobError) -> Self {
        match e {
            PrintJobError::Busy(id) => AppError::Conflict(format!("Order {} is already printing", id)),
            PrintJobError::InvalidTemplate(msg) => AppError::Validation(msg),
            PrintJobError::Print(e @ PrintError::InvalidConfig(_)) => AppError::Internal(e.to_string()),
            PrintJobError::Print(e) => AppError::Printer(e.to_string()),
        }
    }
}

/// 成功响应
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: impl Into<AppError>) -> StatusCode {
        e.into().into_response().status()
    }

    #[test]
    fn test_station_errors_map_to_status() {
        assert_eq!(status_of(StationError::NotFound("Order 9".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(StationError::Validation("bad".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(StationError::Config("No printer configured".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(StationError::Store(StoreError::OrderNotFound(4))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_client_and_print_errors_map_to_status() {
        assert_eq!(status_of(ClientError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ClientError::Unauthorized("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(PrintJobError::Busy(7)), StatusCode::CONFLICT);
        assert_eq!(
            status_of(PrintJobError::Print(PrintError::Offline("10.0.0.5:9100".into()))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
