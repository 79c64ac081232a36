//! HTTP handler Result 类型

use super::error::AppError;

pub type AppResult<T> = Result<T, AppError>;
