//! Woo Client - HTTP client for the WooCommerce REST API (v3)
//!
//! Orders, products and categories of one store, authenticated with a
//! consumer key and secret.

pub mod config;
pub mod error;
pub mod http;
pub mod query;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::WooClient;
pub use query::{CategoryQuery, OrderQuery, ProductQuery};
