//! 工具模块
//!
//! - [`logger`] - 日志初始化
//! - [`error`] - HTTP API 错误和统一响应
//! - [`result`] - [`AppResult`] 别名

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, AppResponse, ok};
pub use result::AppResult;
