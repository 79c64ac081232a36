//! Woo Station - WooCommerce 订单打印工作站
//!
//! 定时从 WooCommerce 拉取订单，缓存在本地 redb，按模板渲染小票，
//! 通过蓝牙串口或网络发送到 ESC/POS / Star 热敏打印机。
//!
//! # 模块结构
//!
//! ```text
//! woo-station/src/
//! ├── api/        # HTTP 路由 (axum)
//! ├── core/       # 配置、状态、错误、后台任务、HTTP 服务
//! ├── orders/     # 订单缓存、轮询、订单服务
//! ├── printing/   # 模板、渲染、打印执行
//! ├── products/   # 商品缓存和价格/库存修改
//! └── utils/      # 日志、API 错误响应
//! ```

pub mod api;
pub mod core;
pub mod orders;
pub mod printing;
pub mod products;
pub mod utils;

pub use core::{BackgroundTasks, Config, StationError, StationState};
pub use orders::{OrderPoller, OrderService, OrderStore};
pub use printing::{PrintExecutor, ReceiptRenderer, TemplateConfig, TemplateType};
pub use products::ProductService;
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境：加载 `.env`、创建工作目录、初始化日志
pub fn setup_environment() -> std::io::Result<Config> {
    // .env 不存在时忽略
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
 _      __              _____ __        __  _
| | /| / /__  ___      / ___// /_____ _/ /_(_)__  ___
| |/ |/ / _ \/ _ \     \__ \/ __/ __ `/ __/ / _ \/ _ \
|__/|__/\___/\___/    ___/ / /_/ /_/ / /_/ / (_) / // /
                     /____/\__/\__,_/\__/_/\___/_//_/
    "#
    );
}
