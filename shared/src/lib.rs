//! Shared types for the Woo printing station
//!
//! Common types used across the workspace crates:
//!
//! - WooCommerce REST DTOs (`dto`)
//! - Domain order and store models (`models`)
//! - WooFood metadata normalization (`woofood`)
//! - Money helpers (`money`)

pub mod dto;
pub mod models;
pub mod money;
pub mod util;
pub mod woofood;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use dto::{
    AddressDto, CategoryDto, FeeLineDto, LineItemDto, MetaDataDto, OrderDto, ProductDto,
    ProductUpdate, TaxLineDto,
};
pub use models::{FeeLine, Order, OrderItem, OrderStatus, StoreInfo, TaxLine};
pub use woofood::{NormalizedOrderMeta, OrderMethod, ScheduleStatus, normalize_order_meta};
