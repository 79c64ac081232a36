//! Product catalogue: in-memory cache and remote price/stock updates

pub mod service;

pub use service::ProductService;
