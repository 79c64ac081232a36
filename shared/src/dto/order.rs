//! Order DTOs

use super::null_default;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /orders/{id}` response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDto {
    pub id: u64,
    pub parent_id: u64,
    #[serde(deserialize_with = "null_default")]
    pub number: String,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    #[serde(deserialize_with = "null_default")]
    pub currency: String,
    /// Site-local creation time, `2024-05-01T12:30:00`
    pub date_created: Option<String>,
    pub date_created_gmt: Option<String>,
    pub date_modified: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub total: String,
    #[serde(deserialize_with = "null_default")]
    pub total_tax: String,
    #[serde(deserialize_with = "null_default")]
    pub discount_total: String,
    #[serde(deserialize_with = "null_default")]
    pub shipping_total: String,
    pub customer_id: u64,
    #[serde(deserialize_with = "null_default")]
    pub customer_note: String,
    #[serde(deserialize_with = "null_default")]
    pub billing: AddressDto,
    #[serde(deserialize_with = "null_default")]
    pub shipping: AddressDto,
    #[serde(deserialize_with = "null_default")]
    pub payment_method: String,
    #[serde(deserialize_with = "null_default")]
    pub payment_method_title: String,
    #[serde(deserialize_with = "null_default")]
    pub line_items: Vec<LineItemDto>,
    #[serde(deserialize_with = "null_default")]
    pub tax_lines: Vec<TaxLineDto>,
    #[serde(deserialize_with = "null_default")]
    pub fee_lines: Vec<FeeLineDto>,
    #[serde(deserialize_with = "null_default")]
    pub shipping_lines: Vec<ShippingLineDto>,
    #[serde(deserialize_with = "null_default")]
    pub meta_data: Vec<MetaDataDto>,
}

/// Billing / shipping address
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AddressDto {
    #[serde(deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_default")]
    pub company: String,
    #[serde(deserialize_with = "null_default")]
    pub address_1: String,
    #[serde(deserialize_with = "null_default")]
    pub address_2: String,
    #[serde(deserialize_with = "null_default")]
    pub city: String,
    #[serde(deserialize_with = "null_default")]
    pub state: String,
    #[serde(deserialize_with = "null_default")]
    pub postcode: String,
    #[serde(deserialize_with = "null_default")]
    pub country: String,
    #[serde(deserialize_with = "null_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_default")]
    pub email: String,
}

impl AddressDto {
    /// `first last`, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Single-line street address, empty when no street is set
    pub fn one_line(&self) -> String {
        let street = [self.address_1.trim(), self.address_2.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if street.is_empty() {
            return String::new();
        }

        let locality = [self.city.trim(), self.state.trim(), self.postcode.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if locality.is_empty() {
            street
        } else {
            format!("{}, {}", street, locality)
        }
    }
}

/// Line item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItemDto {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub product_id: u64,
    pub variation_id: u64,
    pub quantity: i64,
    #[serde(deserialize_with = "null_default")]
    pub sku: String,
    #[serde(deserialize_with = "null_default")]
    pub subtotal: String,
    #[serde(deserialize_with = "null_default")]
    pub total: String,
    #[serde(deserialize_with = "null_default")]
    pub meta_data: Vec<MetaDataDto>,
}

/// Loosely typed metadata entry.
///
/// `value` may be a string, number, bool, object or array depending on the
/// plugin that wrote it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetaDataDto {
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_default")]
    pub key: String,
    pub value: Value,
    pub display_key: Option<String>,
    pub display_value: Option<Value>,
}

impl MetaDataDto {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}

/// Fee line (tips, delivery fees, surcharges)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeeLineDto {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub total: String,
    #[serde(deserialize_with = "null_default")]
    pub total_tax: String,
}

impl FeeLineDto {
    pub fn new(name: impl Into<String>, total: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: total.into(),
            ..Default::default()
        }
    }
}

/// Tax line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxLineDto {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub rate_code: String,
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    pub rate_percent: Option<f64>,
    #[serde(deserialize_with = "null_default")]
    pub tax_total: String,
    #[serde(deserialize_with = "null_default")]
    pub shipping_tax_total: String,
}

/// Shipping line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingLineDto {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub method_title: String,
    #[serde(deserialize_with = "null_default")]
    pub method_id: String,
    #[serde(deserialize_with = "null_default")]
    pub total: String,
}

/// `PUT /orders/{id}` body for status changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_nulls_and_mixed_meta() {
        let json = r#"{
            "id": 42,
            "number": "42",
            "status": "processing",
            "customer_note": null,
            "billing": {"first_name": "Ada", "last_name": "Lovelace", "phone": null},
            "shipping": null,
            "line_items": [{"id": 1, "name": "Dumplings", "quantity": 2, "total": "12.00", "price": 6}],
            "meta_data": [
                {"id": 7, "key": "exwfood_order_method", "value": "delivery"},
                {"id": 8, "key": "exwfood_date_deli_unix", "value": 1714521600},
                {"id": 9, "key": "_wc_extra", "value": {"nested": true}}
            ],
            "unknown_field": "ignored"
        }"#;

        let order: OrderDto = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, 42);
        assert_eq!(order.customer_note, "");
        assert_eq!(order.billing.full_name(), "Ada Lovelace");
        assert_eq!(order.shipping, AddressDto::default());
        assert_eq!(order.line_items[0].quantity, 2);
        assert_eq!(order.meta_data.len(), 3);
        assert!(order.meta_data[1].value.is_number());
    }

    #[test]
    fn test_address_one_line() {
        let addr = AddressDto {
            address_1: "1 Main St".into(),
            address_2: "Apt 2".into(),
            city: "Springfield".into(),
            postcode: "12345".into(),
            ..Default::default()
        };
        assert_eq!(addr.one_line(), "1 Main St Apt 2, Springfield 12345");
        assert_eq!(AddressDto::default().one_line(), "");
    }
}
