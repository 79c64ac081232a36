//! Metadata key lists and lookup

use crate::dto::MetaDataDto;
use serde_json::Value;

pub(crate) const ORDER_METHOD_KEYS: &[&str] = &[
    "exwfood_order_method",
    "_order_type",
    "order_type",
    "_woofood_order_type",
];

pub(crate) const DATE_TEXT_KEYS: &[&str] = &[
    "exwfood_date_deli",
    "exwfood_date_pick",
    "woofood_date_deli",
    "woofood_date_pick",
    "delivery_date",
    "pickup_date",
];

pub(crate) const DATE_UNIX_KEYS: &[&str] = &["exwfood_date_deli_unix", "exwfood_datetime_deli_unix"];

pub(crate) const TIME_KEYS: &[&str] = &[
    "exwfood_time_deli",
    "exwfood_delivery_time",
    "delivery_time",
    "_delivery_time",
    "_woofood_delivery_time",
    "exwfood_timeslot",
];

pub(crate) const ADDRESS_KEYS: &[&str] = &[
    "exwfood_delivery_address",
    "delivery_address",
    "_delivery_address",
    "_woofood_delivery_address",
];

pub(crate) const PARTY_SIZE_KEYS: &[&str] = &[
    "exwfood_person_dinein",
    "exwfood_number_person",
    "party_size",
    "number_of_guests",
    "guests",
];

pub(crate) const DELIVERY_FEE_KEYS: &[&str] = &[
    "exwfood_delivery_fee",
    "delivery_fee",
    "_delivery_fee",
    "_woofood_delivery_fee",
];

pub(crate) const TIP_KEYS: &[&str] = &["exwfood_tip", "tip", "_tip", "_woofood_tip"];

/// Case-insensitive lookup over an order's metadata.
///
/// For a list of candidate keys, an exact (case-insensitive) match on any
/// candidate wins over a partial match. A partial match is a substring
/// match, so `delivery_date` finds `exwfood_delivery_datetime`.
pub struct MetaLookup<'a> {
    entries: &'a [MetaDataDto],
}

impl<'a> MetaLookup<'a> {
    pub fn new(entries: &'a [MetaDataDto]) -> Self {
        Self { entries }
    }

    /// First non-blank value for any of `keys`
    pub fn find(&self, keys: &[&str]) -> Option<String> {
        self.find_where(keys, |_| true)
    }

    /// Like [`find`](Self::find), skipping entries whose lowercased key
    /// fails `accept`
    pub fn find_where(&self, keys: &[&str], accept: impl Fn(&str) -> bool) -> Option<String> {
        let candidates: Vec<(String, String)> = self
            .entries
            .iter()
            .filter_map(|e| {
                let key = e.key.trim().to_lowercase();
                if !accept(&key) {
                    return None;
                }
                value_to_string(&e.value).map(|v| (key, v))
            })
            .collect();

        for wanted in keys {
            let wanted = wanted.to_lowercase();
            if let Some((_, v)) = candidates.iter().find(|(k, _)| *k == wanted) {
                return Some(v.clone());
            }
        }

        for wanted in keys {
            let wanted = wanted.to_lowercase();
            if wanted.is_empty() {
                continue;
            }
            if let Some((_, v)) = candidates.iter().find(|(k, _)| k.contains(&wanted)) {
                return Some(v.clone());
            }
        }

        None
    }
}

/// Metadata value as a trimmed, non-blank string
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    if s.is_empty() { None } else { Some(s) }
}
