use crate::orders::StoreError;
use crate::printing::PrintJobError;
use thiserror::Error;
use woo_client::ClientError;

#[derive(Error, Debug)]
pub enum StationError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Print(#[from] PrintJobError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StationError {
    /// 单个资源的远端调用：商店返回 404 时转为 [`StationError::NotFound`]
    pub fn for_resource(err: ClientError, kind: &str, id: u64) -> Self {
        match err {
            ClientError::NotFound(_) => StationError::NotFound(format!("{} {}", kind, id)),
            other => StationError::Client(other),
        }
    }
}

/// 工作站的 Result 类型别名
pub type Result<T> = std::result::Result<T, StationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_not_found_names_the_resource() {
        let err = StationError::for_resource(ClientError::NotFound("{}".into()), "Order", 42);
        assert!(matches!(&err, StationError::NotFound(msg) if msg == "Order 42"));

        let err = StationError::for_resource(ClientError::Validation("bad".into()), "Order", 42);
        assert!(matches!(err, StationError::Client(ClientError::Validation(_))));
    }
}
