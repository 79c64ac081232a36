//! Domain models
//!
//! Built from the WooCommerce DTOs once per fetch; everything downstream
//! (cache, receipts, services) works with these.

pub mod order;
pub mod store_info;

// Re-exports
pub use order::*;
pub use store_info::*;
