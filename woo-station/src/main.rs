use anyhow::Context;
use woo_station::{BackgroundTasks, StationState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment().context("Failed to set up environment")?;

    print_banner();
    tracing::info!(
        site = %config.woo_site_url,
        environment = %config.environment,
        "Woo Station starting..."
    );

    // 2. 初始化服务
    let state = StationState::initialize(&config)
        .await
        .context("Failed to initialize station")?;

    if let Err(e) = state.client.test_connection().await {
        // 不退出，轮询会在下一轮重试
        tracing::warn!(error = %e, "WooCommerce connection check failed");
    }

    // 3. 启动后台任务 (轮询、预热、HTTP API)
    match config.http_addr() {
        Some(addr) => tracing::info!(%addr, "HTTP API enabled"),
        None => tracing::info!("HTTP API disabled"),
    }
    let mut tasks = BackgroundTasks::new();
    state.start_background_tasks(&mut tasks);

    // 4. 等待 Ctrl+C，期间定时检查后台任务
    let mut health = tokio::time::interval(std::time::Duration::from_secs(60));
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for shutdown signal")?;
                tracing::info!("Shutdown signal received");
                break;
            }
            _ = health.tick() => {
                tasks.check_health();
            }
        }
    }

    tasks.shutdown().await;
    tracing::info!("Woo Station stopped");
    Ok(())
}
