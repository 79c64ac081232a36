//! Order Model

use crate::dto::{FeeLineDto, LineItemDto, MetaDataDto, OrderDto};
use crate::money::parse_amount;
use crate::util::parse_woo_datetime;
use crate::woofood::keys::value_to_string;
use crate::woofood::{
    NormalizedOrderMeta, is_delivery_fee_name, is_tip_fee_name, normalize_order_meta,
};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// WooCommerce order status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
    /// Custom statuses registered by plugins
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
            OrderStatus::Other(s) => s,
        }
    }

    /// Still waiting for the kitchen or the driver
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Processing | OrderStatus::OnHold
        )
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "on-hold" => OrderStatus::OnHold,
            "completed" => OrderStatus::Completed,
            "cancelled" => OrderStatus::Cancelled,
            "refunded" => OrderStatus::Refunded,
            "failed" => OrderStatus::Failed,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        OrderStatus::from(s.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected product option (size, spice level, add-ons)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOption {
    pub name: String,
    pub value: String,
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: u64,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Line total after discounts
    pub total: Decimal,
    #[serde(default)]
    pub options: Vec<ItemOption>,
}

/// What a fee line is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    Tip,
    Delivery,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    pub name: String,
    pub amount: Decimal,
    pub kind: FeeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    pub label: String,
    pub rate_percent: Option<Decimal>,
    pub amount: Decimal,
}

/// Order entity with normalized fulfilment metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub number: String,
    pub status: OrderStatus,
    /// Store-local creation time
    pub created_at: Option<NaiveDateTime>,
    pub modified_at: Option<NaiveDateTime>,
    pub currency: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_note: Option<String>,
    pub billing_address: Option<String>,
    pub shipping_address: Option<String>,
    pub payment_method: String,
    pub items: Vec<OrderItem>,
    pub fee_lines: Vec<FeeLine>,
    pub tax_lines: Vec<TaxLine>,
    pub subtotal: Decimal,
    pub discount_total: Decimal,
    pub total_tax: Decimal,
    pub total: Decimal,
    pub meta: NormalizedOrderMeta,
}

impl Order {
    /// Build the domain order from a REST payload.
    ///
    /// Tips and delivery fees that only appear in metadata or the customer
    /// note get a synthesized fee line; a missing tax breakdown with a
    /// non-zero `total_tax` gets a single `Tax` line.
    pub fn from_dto(dto: &OrderDto, tz: Tz) -> Self {
        let meta = normalize_order_meta(&dto.meta_data, &dto.fee_lines, &dto.customer_note, tz);

        let items: Vec<OrderItem> = dto.line_items.iter().map(item_from_dto).collect();
        let subtotal: Decimal = dto
            .line_items
            .iter()
            .map(|i| {
                if i.subtotal.trim().is_empty() {
                    parse_amount(&i.total)
                } else {
                    parse_amount(&i.subtotal)
                }
            })
            .sum();

        let fee_lines = build_fee_lines(&dto.fee_lines, &meta);

        let total_tax = parse_amount(&dto.total_tax);
        let mut tax_lines: Vec<TaxLine> = dto
            .tax_lines
            .iter()
            .map(|t| TaxLine {
                label: if t.label.trim().is_empty() {
                    "Tax".to_string()
                } else {
                    t.label.trim().to_string()
                },
                rate_percent: t.rate_percent.and_then(Decimal::from_f64),
                amount: parse_amount(&t.tax_total) + parse_amount(&t.shipping_tax_total),
            })
            .collect();
        if tax_lines.is_empty() && !total_tax.is_zero() {
            tax_lines.push(TaxLine {
                label: "Tax".to_string(),
                rate_percent: None,
                amount: total_tax,
            });
        }

        let customer_name = [dto.billing.full_name(), dto.shipping.full_name()]
            .into_iter()
            .find(|n| !n.is_empty())
            .unwrap_or_else(|| "Guest".to_string());
        let customer_phone = [dto.billing.phone.trim(), dto.shipping.phone.trim()]
            .into_iter()
            .find(|p| !p.is_empty())
            .map(str::to_string);

        let payment_method = [dto.payment_method_title.trim(), dto.payment_method.trim()]
            .into_iter()
            .find(|p| !p.is_empty())
            .unwrap_or("Unspecified")
            .to_string();

        Self {
            id: dto.id,
            number: if dto.number.trim().is_empty() {
                dto.id.to_string()
            } else {
                dto.number.trim().to_string()
            },
            status: OrderStatus::from(dto.status.as_str()),
            created_at: dto.date_created.as_deref().and_then(parse_woo_datetime),
            modified_at: dto.date_modified.as_deref().and_then(parse_woo_datetime),
            currency: dto.currency.clone(),
            customer_name,
            customer_phone,
            customer_note: non_blank(&dto.customer_note),
            billing_address: non_blank(&dto.billing.one_line()),
            shipping_address: non_blank(&dto.shipping.one_line()),
            payment_method,
            items,
            fee_lines,
            tax_lines,
            subtotal,
            discount_total: parse_amount(&dto.discount_total),
            total_tax,
            total: parse_amount(&dto.total),
            meta,
        }
    }

    /// Where a delivery goes: metadata address, shipping, then billing
    pub fn delivery_address(&self) -> Option<&str> {
        self.meta
            .delivery_address
            .as_deref()
            .or(self.shipping_address.as_deref())
            .or(self.billing_address.as_deref())
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

fn item_from_dto(dto: &LineItemDto) -> OrderItem {
    let total = parse_amount(&dto.total);
    let unit_price = if dto.quantity > 0 {
        (parse_amount(if dto.subtotal.trim().is_empty() {
            &dto.total
        } else {
            &dto.subtotal
        }) / Decimal::from(dto.quantity))
        .round_dp(2)
    } else {
        total
    };

    OrderItem {
        product_id: dto.product_id,
        name: dto.name.trim().to_string(),
        quantity: dto.quantity,
        unit_price,
        total,
        options: dto.meta_data.iter().filter_map(option_from_meta).collect(),
    }
}

/// Visible item metadata becomes an option; `_`-prefixed keys are internal
fn option_from_meta(meta: &MetaDataDto) -> Option<ItemOption> {
    if meta.key.starts_with('_') {
        return None;
    }
    let name = meta
        .display_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(meta.key.trim())
        .to_string();
    let value = meta
        .display_value
        .as_ref()
        .and_then(value_to_string)
        .or_else(|| value_to_string(&meta.value))?;
    Some(ItemOption { name, value })
}

fn build_fee_lines(dtos: &[FeeLineDto], meta: &NormalizedOrderMeta) -> Vec<FeeLine> {
    let mut lines: Vec<FeeLine> = dtos
        .iter()
        .map(|f| FeeLine {
            name: f.name.trim().to_string(),
            amount: parse_amount(&f.total),
            kind: if is_tip_fee_name(&f.name) {
                FeeKind::Tip
            } else if is_delivery_fee_name(&f.name) {
                FeeKind::Delivery
            } else {
                FeeKind::Other
            },
        })
        .collect();

    let has_kind = |lines: &[FeeLine], kind: FeeKind| {
        lines.iter().any(|l| l.kind == kind && !l.amount.is_zero())
    };

    if let Some(fee) = meta.delivery_fee
        && !has_kind(&lines, FeeKind::Delivery)
    {
        lines.push(FeeLine {
            name: "Delivery fee".to_string(),
            amount: fee,
            kind: FeeKind::Delivery,
        });
    }
    if let Some(tip) = meta.tip
        && !has_kind(&lines, FeeKind::Tip)
    {
        lines.push(FeeLine {
            name: "Tip".to_string(),
            amount: tip,
            kind: FeeKind::Tip,
        });
    }

    lines
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{AddressDto, TaxLineDto};
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_dto() -> OrderDto {
        OrderDto {
            id: 1001,
            number: "1001".into(),
            status: "processing".into(),
            date_created: Some("2024-05-01T12:00:00".into()),
            total: "27.50".into(),
            total_tax: "1.50".into(),
            customer_note: "Ring the bell. Delivery fee: 3".into(),
            billing: AddressDto {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                phone: "555-0101".into(),
                address_1: "1 Main St".into(),
                city: "Springfield".into(),
                ..Default::default()
            },
            payment_method: "cod".into(),
            line_items: vec![LineItemDto {
                name: "Dumplings".into(),
                product_id: 7,
                quantity: 2,
                subtotal: "12.00".into(),
                total: "12.00".into(),
                meta_data: vec![
                    MetaDataDto::new("Filling", json!("Pork")),
                    MetaDataDto::new("_reduced_stock", json!(2)),
                ],
                ..Default::default()
            }],
            meta_data: vec![
                MetaDataDto::new("exwfood_order_method", json!("delivery")),
                MetaDataDto::new("exwfood_tip", json!("2")),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_from_dto_basics() {
        let order = Order::from_dto(&sample_dto(), Tz::UTC);
        assert_eq!(order.number, "1001");
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.customer_name, "Ada Lovelace");
        assert_eq!(order.customer_phone.as_deref(), Some("555-0101"));
        assert_eq!(order.payment_method, "cod");
        assert_eq!(order.items[0].unit_price, dec("6"));
        assert_eq!(order.items[0].options.len(), 1);
        assert_eq!(order.items[0].options[0].value, "Pork");
        assert_eq!(order.subtotal, dec("12"));
        assert_eq!(order.delivery_address(), Some("1 Main St, Springfield"));
        assert!(order.meta.is_delivery);
    }

    #[test]
    fn test_fee_lines_are_synthesized() {
        let order = Order::from_dto(&sample_dto(), Tz::UTC);
        let kinds: Vec<_> = order.fee_lines.iter().map(|f| (f.kind, f.amount)).collect();
        assert_eq!(
            kinds,
            vec![(FeeKind::Delivery, dec("3")), (FeeKind::Tip, dec("2"))]
        );
    }

    #[test]
    fn test_existing_fee_lines_are_not_duplicated() {
        let mut dto = sample_dto();
        dto.customer_note.clear();
        dto.fee_lines = vec![FeeLineDto::new("Delivery Fee", "3.00")];
        let order = Order::from_dto(&dto, Tz::UTC);
        let delivery = order
            .fee_lines
            .iter()
            .filter(|f| f.kind == FeeKind::Delivery)
            .count();
        assert_eq!(delivery, 1);
    }

    #[test]
    fn test_default_tax_line() {
        let order = Order::from_dto(&sample_dto(), Tz::UTC);
        assert_eq!(order.tax_lines.len(), 1);
        assert_eq!(order.tax_lines[0].label, "Tax");
        assert_eq!(order.tax_lines[0].amount, dec("1.5"));

        let mut dto = sample_dto();
        dto.tax_lines = vec![TaxLineDto {
            label: "GST".into(),
            rate_percent: Some(5.0),
            tax_total: "1.50".into(),
            ..Default::default()
        }];
        let order = Order::from_dto(&dto, Tz::UTC);
        assert_eq!(order.tax_lines[0].label, "GST");
        assert_eq!(order.tax_lines[0].rate_percent, Some(dec("5")));
    }

    #[test]
    fn test_guest_and_payment_fallbacks() {
        let dto = OrderDto {
            id: 5,
            ..Default::default()
        };
        let order = Order::from_dto(&dto, Tz::UTC);
        assert_eq!(order.customer_name, "Guest");
        assert_eq!(order.payment_method, "Unspecified");
        assert_eq!(order.number, "5");
        assert_eq!(order.status, OrderStatus::Other(String::new()));
    }

    #[test]
    fn test_status_round_trip_through_serde() {
        let json = serde_json::to_string(&OrderStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");
        let back: OrderStatus = serde_json::from_str("\"wc-ready\"").unwrap();
        assert_eq!(back, OrderStatus::Other("wc-ready".into()));
    }
}
