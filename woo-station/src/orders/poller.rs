//! Order polling worker
//!
//! 定时拉取 WooCommerce 订单，新订单写入本地缓存并自动打印。
//!
//! - 首次运行：拉取最近 24 小时内修改过的订单
//! - 之后：从上次检查时间往前 5 分钟开始（防止时钟偏差漏单）
//! - 只有拉到新订单时才推进 last_check
//! - 只拉取并打印 processing 状态的订单

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;
use shared::dto::OrderDto;
use shared::models::{Order, OrderStatus};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use woo_client::{OrderQuery, WooClient};

use super::store::OrderStore;
use crate::core::Result;
use crate::printing::PrintExecutor;

/// First-run lookback
const INITIAL_LOOKBACK_HOURS: i64 = 24;

/// Overlap with the previous window
const CHECK_BUFFER_MINUTES: i64 = 5;

/// Orders per page when polling
const POLL_PAGE_SIZE: u32 = 50;

/// One poll cycle's outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Orders returned by the store
    pub fetched: usize,
    /// Ids not seen before, in arrival order
    pub new_ids: Vec<u64>,
    pub printed: usize,
    pub print_failures: usize,
}

/// 订单轮询器
pub struct OrderPoller {
    client: WooClient,
    store: OrderStore,
    executor: Option<Arc<PrintExecutor>>,
    timezone: Tz,
    interval: std::time::Duration,
}

impl OrderPoller {
    /// `executor` is `None` when auto-print is off
    pub fn new(
        client: WooClient,
        store: OrderStore,
        executor: Option<Arc<PrintExecutor>>,
        timezone: Tz,
        interval: std::time::Duration,
    ) -> Self {
        Self {
            client,
            store,
            executor,
            timezone,
            interval,
        }
    }

    /// 运行轮询循环，直到收到关闭信号
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            auto_print = self.executor.is_some(),
            "Order poller started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Order poller received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(outcome) if !outcome.new_ids.is_empty() => {
                            tracing::info!(
                                fetched = outcome.fetched,
                                new = outcome.new_ids.len(),
                                printed = outcome.printed,
                                failed = outcome.print_failures,
                                "Poll cycle finished"
                            );
                        }
                        Ok(outcome) => {
                            tracing::debug!(fetched = outcome.fetched, "No new orders");
                        }
                        Err(e) => {
                            // 下一轮再试，窗口不前进
                            tracing::error!(error = %e, "Order poll failed");
                        }
                    }
                }
            }
        }
    }

    /// Fetch, cache and print one window of orders
    pub async fn poll_once(&self) -> Result<PollOutcome> {
        let now = Utc::now();
        let since = poll_window_start(self.store.last_check()?, now, self.timezone);

        let query = window_query(since);
        let dtos = self.client.list_all_orders(&query).await?;
        tracing::debug!(since = %since, count = dtos.len(), "Fetched order window");

        self.ingest(&dtos, now).await
    }

    /// Cache fetched orders; print the unseen ones when auto-print is on
    pub async fn ingest(&self, dtos: &[OrderDto], now: DateTime<Utc>) -> Result<PollOutcome> {
        let mut outcome = PollOutcome {
            fetched: dtos.len(),
            ..Default::default()
        };

        let mut fresh = Vec::new();
        for dto in dtos {
            let order = Order::from_dto(dto, self.timezone);
            if self.store.upsert_order(&order)? {
                tracing::info!(
                    order_id = order.id,
                    number = %order.number,
                    method = %order.meta.method(),
                    "New order"
                );
                outcome.new_ids.push(order.id);
                fresh.push(order);
            }
        }

        if let Some(executor) = &self.executor {
            for order in fresh.iter().filter(|o| awaits_print(o)) {
                // 失败只记录，不自动重试
                match executor.print_order(order).await {
                    Ok(()) => {
                        self.store.mark_printed(order.id)?;
                        outcome.printed += 1;
                    }
                    Err(e) => {
                        tracing::warn!(order_id = order.id, error = %e, "Auto-print failed");
                        outcome.print_failures += 1;
                    }
                }
            }
        }

        if !outcome.new_ids.is_empty() {
            self.store.set_last_check(now)?;
        }
        Ok(outcome)
    }
}

/// Orders the kitchen still has to prepare
pub(crate) fn awaits_print(order: &Order) -> bool {
    order.status == OrderStatus::Processing
}

/// Paid orders modified since `since`
fn window_query(since: NaiveDateTime) -> OrderQuery {
    OrderQuery::default()
        .status(OrderStatus::Processing.as_str())
        .per_page(POLL_PAGE_SIZE)
        .modified_after(since)
}

/// Start of the `modified_after` window, in store local time
pub fn poll_window_start(
    last_check: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    tz: Tz,
) -> NaiveDateTime {
    let start = match last_check {
        Some(last) => last - Duration::minutes(CHECK_BUFFER_MINUTES),
        None => now - Duration::hours(INITIAL_LOOKBACK_HOURS),
    };
    start.with_timezone(&tz).naive_local()
}
