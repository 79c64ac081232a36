//! redb-based order cache
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | order id | `Order` (JSON) | Latest known state of each order |
//! | `printed` | order id | printed-at (ms) | Receipt already printed |
//! | `poll_state` | `"last_check"` | UTC ms | Poller watermark |

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use shared::models::{Order, OrderStatus};
use shared::util::now_millis;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const ORDERS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("orders");

const PRINTED_TABLE: TableDefinition<u64, i64> = TableDefinition::new("printed");

const POLL_STATE_TABLE: TableDefinition<&str, i64> = TableDefinition::new("poll_state");

const LAST_CHECK_KEY: &str = "last_check";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(u64),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Local cache of polled orders
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::init(Database::create(path)?)
    }

    /// Open in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(PRINTED_TABLE)?;
            let _ = write_txn.open_table(POLL_STATE_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    // ========== Orders ==========

    /// Insert or replace an order; returns `true` when the id was unseen
    pub fn upsert_order(&self, order: &Order) -> StoreResult<bool> {
        let value = serde_json::to_vec(order)?;
        let write_txn = self.db.begin_write()?;
        let is_new = {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            table.insert(order.id, value.as_slice())?.is_none()
        };
        write_txn.commit()?;
        Ok(is_new)
    }

    pub fn contains(&self, id: u64) -> StoreResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.get(id)?.is_some())
    }

    pub fn get_order(&self, id: u64) -> StoreResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Cached orders, newest first, optionally filtered by status
    pub fn list_orders(&self, status: Option<&OrderStatus>) -> StoreResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_, guard) = result?;
            let order: Order = serde_json::from_slice(guard.value())?;
            if status.is_none_or(|s| *s == order.status) {
                orders.push(order);
            }
        }

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    pub fn order_count(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.len()?)
    }

    /// Replace the status of a cached order
    pub fn set_status(&self, id: u64, status: OrderStatus) -> StoreResult<Order> {
        let mut order = self.get_order(id)?.ok_or(StoreError::OrderNotFound(id))?;
        order.status = status;
        self.upsert_order(&order)?;
        Ok(order)
    }

    // ========== Printed flags ==========

    pub fn mark_printed(&self, id: u64) -> StoreResult<()> {
        if !self.contains(id)? {
            return Err(StoreError::OrderNotFound(id));
        }
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PRINTED_TABLE)?;
            table.insert(id, now_millis())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn is_printed(&self, id: u64) -> StoreResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRINTED_TABLE)?;
        Ok(table.get(id)?.is_some())
    }

    /// Cached orders without a printed receipt, oldest first
    pub fn unprinted_orders(&self) -> StoreResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let printed = read_txn.open_table(PRINTED_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in orders.iter()? {
            let (key, guard) = entry?;
            if printed.get(key.value())?.is_none() {
                result.push(serde_json::from_slice::<Order>(guard.value())?);
            }
        }
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    // ========== Poll state ==========

    pub fn last_check(&self) -> StoreResult<Option<DateTime<Utc>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(POLL_STATE_TABLE)?;
        Ok(table
            .get(LAST_CHECK_KEY)?
            .and_then(|g| DateTime::from_timestamp_millis(g.value())))
    }

    pub fn set_last_check(&self, at: DateTime<Utc>) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(POLL_STATE_TABLE)?;
            table.insert(LAST_CHECK_KEY, at.timestamp_millis())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
