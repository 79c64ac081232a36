use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use woo_client::WooClient;

use crate::core::server;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result};
use crate::orders::{OrderPoller, OrderService, OrderStore};
use crate::printing::PrintExecutor;
use crate::products::ProductService;

/// 工作站状态 - 持有所有服务的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | client | WooClient | WooCommerce REST 客户端 |
/// | store | OrderStore | redb 订单缓存 |
/// | executor | Option<Arc<PrintExecutor>> | 打印执行器 (打印机配置无效时为空) |
/// | orders | OrderService | 订单服务 |
/// | products | ProductService | 商品服务 |
#[derive(Clone)]
pub struct StationState {
    pub config: Config,
    pub client: WooClient,
    pub store: OrderStore,
    pub executor: Option<Arc<PrintExecutor>>,
    pub orders: OrderService,
    pub products: ProductService,
}

impl StationState {
    /// 按配置初始化所有服务
    ///
    /// 打印机配置错误不会阻止启动：订单照常缓存，只是不打印。
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(PathBuf::from(&config.work_dir))?;

        let store = OrderStore::open(config.db_path())?;
        let client = config.client_config().build()?;

        let executor = match PrintExecutor::from_config(config) {
            Ok(executor) => {
                tracing::info!(
                    printer = %executor.target(),
                    vendor = %executor.profile().vendor,
                    template = %config.template,
                    "Printer configured"
                );
                Some(Arc::new(executor))
            }
            Err(e) => {
                tracing::error!(error = %e, "Printer setup failed, printing disabled");
                None
            }
        };

        let orders = OrderService::new(
            client.clone(),
            store.clone(),
            executor.clone(),
            config.timezone,
        );
        let products = ProductService::new(client.clone());

        Ok(Self {
            config: config.clone(),
            client,
            store,
            executor,
            orders,
            products,
        })
    }

    /// 注册后台任务
    ///
    /// - 商品缓存预热 (Warmup)
    /// - 订单轮询 (Periodic)
    /// - HTTP API (Listener，`HTTP_PORT=0` 时不启动)
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let products = self.products.clone();
        tasks.spawn("product_warmup", TaskKind::Warmup, async move {
            if let Err(e) = products.refresh().await {
                tracing::warn!(error = %e, "Product cache warmup failed");
            }
        });

        let auto_print = if self.config.auto_print {
            self.executor.clone()
        } else {
            None
        };
        let poller = OrderPoller::new(
            self.client.clone(),
            self.store.clone(),
            auto_print,
            self.config.timezone,
            Duration::from_secs(self.config.poll_interval_secs),
        );
        tasks.spawn("order_poller", TaskKind::Periodic, poller.run(tasks.shutdown_token()));

        if let Some(addr) = self.config.http_addr() {
            let state = self.clone();
            let shutdown = tasks.shutdown_token();
            tasks.spawn("http_api", TaskKind::Listener, async move {
                if let Err(e) = server::serve(state, addr, shutdown).await {
                    tracing::error!(error = %e, %addr, "HTTP API failed");
                }
            });
        }
    }
}
