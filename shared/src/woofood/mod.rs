//! WooFood order metadata normalization
//!
//! WooFood (and a handful of similar plugins) store the fulfilment details of
//! an order as free-form `meta_data` entries. Key names, value types and date
//! formats vary between plugin versions and site configurations. This module
//! turns them into a single [`NormalizedOrderMeta`].
//!
//! Normalization is a pure function of its inputs: the store time zone is an
//! explicit parameter and nothing is cached between calls.

mod dates;
mod fees;
pub(crate) mod keys;
mod normalize;
mod schedule;

pub use dates::{parse_delivery_date, parse_time_window_start, parse_unix_date};
pub use fees::{delivery_fee_from_note, is_delivery_fee_name, is_tip_fee_name};
pub use keys::MetaLookup;
pub use normalize::normalize_order_meta;
pub use schedule::{ScheduleStatus, relative_day_label, schedule_status};

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fulfilment details extracted from order metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedOrderMeta {
    /// Raw order method as sent by the store (`delivery`, `takeaway`, ...)
    pub order_method: String,
    /// Requested date, serialized as `yyyy-MM-dd`
    pub delivery_date: Option<NaiveDate>,
    /// Requested time or time window, as entered
    pub delivery_time: Option<String>,
    pub party_size: Option<u32>,
    /// `order_method == "delivery"`, case-insensitive
    pub is_delivery: bool,
    pub delivery_address: Option<String>,
    pub delivery_fee: Option<Decimal>,
    pub tip: Option<Decimal>,
    /// Start of the requested time window
    pub time_window_start: Option<NaiveTime>,
}

impl NormalizedOrderMeta {
    pub fn method(&self) -> OrderMethod {
        if self.is_delivery {
            return OrderMethod::Delivery;
        }
        if self.party_size.is_some() || OrderMethod::is_dine_in_label(&self.order_method) {
            return OrderMethod::DineIn;
        }
        OrderMethod::Pickup
    }

    /// `yyyy-MM-dd` or nothing
    pub fn delivery_date_str(&self) -> Option<String> {
        self.delivery_date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

/// Fulfilment kind derived from the order method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMethod {
    Delivery,
    Pickup,
    DineIn,
}

impl OrderMethod {
    fn is_dine_in_label(method: &str) -> bool {
        let m = method.trim().to_lowercase();
        matches!(m.as_str(), "dinein" | "dine-in" | "dine_in") || m.contains("堂食")
    }

    /// Receipt label
    pub fn label(&self) -> &'static str {
        match self {
            OrderMethod::Delivery => "DELIVERY",
            OrderMethod::Pickup => "PICKUP",
            OrderMethod::DineIn => "DINE-IN",
        }
    }
}

impl std::fmt::Display for OrderMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
