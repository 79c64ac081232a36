//! Orders: local cache, polling worker and service

pub mod poller;
pub mod service;
pub mod store;

pub use poller::{OrderPoller, PollOutcome};
pub use service::OrderService;
pub use store::{OrderStore, StoreError, StoreResult};
