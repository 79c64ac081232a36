//! Order service
//!
//! Operations on orders for the station front end: cached listing, status
//! changes pushed to WooCommerce, and manual (re)printing.

use chrono_tz::Tz;
use shared::models::{Order, OrderStatus};
use std::sync::Arc;
use tracing::{info, instrument};
use woo_client::WooClient;

use super::poller::awaits_print;
use super::store::OrderStore;
use crate::core::{Result, StationError};
use crate::printing::{PrintExecutor, TemplateType};

#[derive(Clone)]
pub struct OrderService {
    client: WooClient,
    store: OrderStore,
    executor: Option<Arc<PrintExecutor>>,
    timezone: Tz,
}

impl OrderService {
    pub fn new(
        client: WooClient,
        store: OrderStore,
        executor: Option<Arc<PrintExecutor>>,
        timezone: Tz,
    ) -> Self {
        Self {
            client,
            store,
            executor,
            timezone,
        }
    }

    /// Cached orders, newest first
    pub fn list(&self, status: Option<&OrderStatus>) -> Result<Vec<Order>> {
        Ok(self.store.list_orders(status)?)
    }

    /// Cached orders that are still being worked on
    pub fn list_open(&self) -> Result<Vec<Order>> {
        Ok(self
            .store
            .list_orders(None)?
            .into_iter()
            .filter(|o| o.status.is_open())
            .collect())
    }

    /// Cached order, fetched from the store when missing
    pub async fn get(&self, id: u64) -> Result<Order> {
        if let Some(order) = self.store.get_order(id)? {
            return Ok(order);
        }
        self.refresh(id).await
    }

    /// Re-fetch one order and replace the cached copy
    #[instrument(skip(self))]
    pub async fn refresh(&self, id: u64) -> Result<Order> {
        let dto = self
            .client
            .get_order(id)
            .await
            .map_err(|e| StationError::for_resource(e, "Order", id))?;
        let order = Order::from_dto(&dto, self.timezone);
        self.store.upsert_order(&order)?;
        Ok(order)
    }

    pub fn mark_printed(&self, id: u64) -> Result<()> {
        Ok(self.store.mark_printed(id)?)
    }

    pub fn is_printed(&self, id: u64) -> Result<bool> {
        Ok(self.store.is_printed(id)?)
    }

    /// Change the status in WooCommerce, then in the cache
    #[instrument(skip(self, status), fields(status = %status.as_str()))]
    pub async fn update_status(&self, id: u64, status: OrderStatus) -> Result<Order> {
        if let OrderStatus::Other(s) = &status
            && s.trim().is_empty()
        {
            return Err(StationError::Validation("Empty order status".into()));
        }

        let dto = self
            .client
            .update_order_status(id, status.as_str())
            .await
            .map_err(|e| StationError::for_resource(e, "Order", id))?;
        let order = Order::from_dto(&dto, self.timezone);
        self.store.upsert_order(&order)?;
        info!(order_id = id, status = %order.status.as_str(), "Order status updated");
        Ok(order)
    }

    /// Print an order again, optionally with another template
    #[instrument(skip(self))]
    pub async fn reprint(&self, id: u64, template: Option<TemplateType>) -> Result<()> {
        let executor = self.executor()?;
        let order = self.get(id).await?;
        match template {
            Some(t) => executor.print_order_as(&order, t).await?,
            None => executor.print_order(&order).await?,
        }
        self.store.mark_printed(id)?;
        Ok(())
    }

    /// Print every cached processing order without a receipt; returns how
    /// many printed. Stops at the first failure.
    pub async fn print_pending(&self) -> Result<usize> {
        let executor = self.executor()?;
        let mut printed = 0;
        for order in self
            .store
            .unprinted_orders()?
            .into_iter()
            .filter(awaits_print)
        {
            executor.print_order(&order).await?;
            self.store.mark_printed(order.id)?;
            printed += 1;
        }
        Ok(printed)
    }

    pub async fn print_test_page(&self) -> Result<()> {
        Ok(self.executor()?.print_test_page().await?)
    }

    fn executor(&self) -> Result<&PrintExecutor> {
        self.executor
            .as_deref()
            .ok_or_else(|| StationError::Config("No printer configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::store::tests::order;
    use woo_client::ClientConfig;

    fn service(store: OrderStore) -> OrderService {
        let client = ClientConfig::new("http://127.0.0.1:9", "ck_test", "cs_test")
            .build()
            .unwrap();
        OrderService::new(client, store, None, chrono_tz::UTC)
    }

    #[tokio::test]
    async fn test_list_and_get_from_cache() {
        let store = OrderStore::open_in_memory().unwrap();
        store.upsert_order(&order(1, 1, OrderStatus::Processing)).unwrap();
        store.upsert_order(&order(2, 2, OrderStatus::Completed)).unwrap();
        let svc = service(store);

        assert_eq!(svc.list(None).unwrap().len(), 2);
        let open: Vec<u64> = svc.list_open().unwrap().iter().map(|o| o.id).collect();
        assert_eq!(open, vec![1]);
        assert_eq!(svc.get(2).await.unwrap().status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_reprint_without_printer_is_config_error() {
        let store = OrderStore::open_in_memory().unwrap();
        store.upsert_order(&order(1, 1, OrderStatus::Processing)).unwrap();
        let svc = service(store);

        assert!(matches!(svc.reprint(1, None).await, Err(StationError::Config(_))));
        assert!(!svc.is_printed(1).unwrap());
    }

    #[tokio::test]
    async fn test_empty_custom_status_rejected() {
        let svc = service(OrderStore::open_in_memory().unwrap());
        let result = svc.update_status(1, OrderStatus::Other(" ".into())).await;
        assert!(matches!(result, Err(StationError::Validation(_))));
    }
}
