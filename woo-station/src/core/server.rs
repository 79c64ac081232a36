//! HTTP API 服务

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::core::{Result, StationState};

/// 在 `addr` 上提供 API，直到 `shutdown` 被取消
pub async fn serve(state: StationState, addr: SocketAddr, shutdown: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP API listening");

    axum::serve(listener, crate::api::router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("HTTP API stopped");
    Ok(())
}
