//! Tip and delivery-fee recognition

use crate::money::non_zero_amount;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

const TIP_NAMES: &[&str] = &["tip", "小费", "appreciation", "gratuity"];

const DELIVERY_NAMES: &[&str] = &[
    "delivery",
    "shipping",
    "外卖",
    "配送",
    "运费",
    "freight",
    "transport",
    "运输",
    "送餐",
];

static NOTE_FEE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(外卖费|配送费|运费|Shipping fee|Delivery fee|delivery charge)[:：]?\s*([¥￥$]?\s*\d+(\.\d+)?)",
    )
    .expect("fee pattern is valid")
});

/// Fee line names that carry a tip
pub fn is_tip_fee_name(name: &str) -> bool {
    let name = name.trim();
    if name.eq_ignore_ascii_case("Show Your Appreciation") {
        return true;
    }
    let lower = name.to_lowercase();
    TIP_NAMES.iter().any(|t| lower.contains(t))
}

/// Fee line names that carry a delivery fee
pub fn is_delivery_fee_name(name: &str) -> bool {
    let name = name.trim();
    if name.eq_ignore_ascii_case("Shipping fee") {
        return true;
    }
    let lower = name.to_lowercase();
    DELIVERY_NAMES.iter().any(|t| lower.contains(t))
}

/// Delivery fee written into the customer note, e.g. `配送费: ¥5`
pub fn delivery_fee_from_note(note: &str) -> Option<Decimal> {
    let caps = NOTE_FEE_RE.captures(note)?;
    non_zero_amount(caps.get(2)?.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tip_names() {
        assert!(is_tip_fee_name("Show Your Appreciation"));
        assert!(is_tip_fee_name("Tip"));
        assert!(is_tip_fee_name("司机小费"));
        assert!(is_tip_fee_name("Gratuity (15%)"));
        assert!(!is_tip_fee_name("Delivery fee"));
    }

    #[test]
    fn test_delivery_names() {
        assert!(is_delivery_fee_name("Shipping fee"));
        assert!(is_delivery_fee_name("Delivery Fee"));
        assert!(is_delivery_fee_name("外卖配送费"));
        assert!(is_delivery_fee_name("Freight"));
        assert!(!is_delivery_fee_name("Bag surcharge"));
    }

    #[test]
    fn test_fee_from_note() {
        assert_eq!(
            delivery_fee_from_note("请放门口。配送费：¥5.50"),
            Some(Decimal::from_str("5.50").unwrap())
        );
        assert_eq!(
            delivery_fee_from_note("Delivery fee: $ 3"),
            Some(Decimal::from_str("3").unwrap())
        );
        assert_eq!(delivery_fee_from_note("Shipping fee 0.00"), None);
        assert_eq!(delivery_fee_from_note("no fee here"), None);
    }
}
