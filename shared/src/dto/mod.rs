//! WooCommerce REST DTOs
//!
//! These mirror the JSON shape of `/wp-json/wc/v3/*`. Every field is
//! defaulted so that plugins adding or nulling fields do not break
//! deserialization.

mod order;
mod product;

pub use order::*;
pub use product::*;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
