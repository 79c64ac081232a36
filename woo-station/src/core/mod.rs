//! 核心模块 - 配置、状态、错误和后台任务
//!
//! - [`Config`] - 工作站配置
//! - [`StationState`] - 服务单例
//! - [`BackgroundTasks`] - 后台任务管理
//! - [`StationError`] - 错误定义
//! - [`server::serve`] - HTTP API 服务

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::{Result, StationError};
pub use state::StationState;
pub use tasks::{BackgroundTasks, TaskKind};
