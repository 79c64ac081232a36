use super::NormalizedOrderMeta;
use super::dates::{parse_delivery_date, parse_time_window_start, parse_unix_date};
use super::fees::{delivery_fee_from_note, is_delivery_fee_name, is_tip_fee_name};
use super::keys::{
    ADDRESS_KEYS, DATE_TEXT_KEYS, DATE_UNIX_KEYS, DELIVERY_FEE_KEYS, MetaLookup,
    ORDER_METHOD_KEYS, PARTY_SIZE_KEYS, TIME_KEYS, TIP_KEYS,
};
use crate::dto::{FeeLineDto, MetaDataDto};
use crate::money::non_zero_amount;
use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;

const METHOD_DELIVERY: &str = "delivery";
const METHOD_PICKUP: &str = "pickup";

/// Normalize an order's fulfilment metadata.
///
/// Lookup order per field:
/// - method: metadata, otherwise `delivery` when a delivery fee was found,
///   otherwise `pickup`
/// - date: Unix-timestamp keys first, then textual date keys
/// - delivery fee: metadata, fee lines, customer note
/// - tip: metadata, fee lines
pub fn normalize_order_meta(
    meta: &[MetaDataDto],
    fee_lines: &[FeeLineDto],
    customer_note: &str,
    tz: Tz,
) -> NormalizedOrderMeta {
    let lookup = MetaLookup::new(meta);

    let delivery_fee = lookup
        .find(DELIVERY_FEE_KEYS)
        .and_then(|v| non_zero_amount(&v))
        .or_else(|| fee_line_amount(fee_lines, is_delivery_fee_name))
        .or_else(|| delivery_fee_from_note(customer_note));

    let tip = lookup
        .find(TIP_KEYS)
        .and_then(|v| non_zero_amount(&v))
        .or_else(|| fee_line_amount(fee_lines, is_tip_fee_name));

    let order_method = lookup.find(ORDER_METHOD_KEYS).unwrap_or_else(|| {
        if delivery_fee.is_some() {
            METHOD_DELIVERY.to_string()
        } else {
            METHOD_PICKUP.to_string()
        }
    });
    let is_delivery = order_method.trim().eq_ignore_ascii_case(METHOD_DELIVERY);

    let delivery_date = resolve_date(&lookup, tz);
    let delivery_time = lookup.find(TIME_KEYS);
    let time_window_start = delivery_time.as_deref().and_then(parse_time_window_start);

    NormalizedOrderMeta {
        order_method,
        delivery_date,
        time_window_start,
        delivery_time,
        party_size: lookup.find(PARTY_SIZE_KEYS).and_then(|v| leading_number(&v)),
        is_delivery,
        delivery_address: lookup.find(ADDRESS_KEYS),
        delivery_fee,
        tip,
    }
}

/// Unix variants take priority over textual ones
fn resolve_date(lookup: &MetaLookup<'_>, tz: Tz) -> Option<NaiveDate> {
    let unix = lookup
        .find(DATE_UNIX_KEYS)
        .and_then(|v| parse_unix_date(&v, tz));
    if unix.is_some() {
        return unix;
    }

    let text = lookup.find_where(DATE_TEXT_KEYS, |key| !key.ends_with("_unix"))?;
    let date = parse_delivery_date(&text);
    if date.is_none() {
        tracing::debug!(value = %text, "Unrecognized delivery date");
    }
    date
}

fn fee_line_amount(fee_lines: &[FeeLineDto], matches: fn(&str) -> bool) -> Option<Decimal> {
    fee_lines
        .iter()
        .filter(|f| matches(&f.name))
        .find_map(|f| non_zero_amount(&f.total))
}

/// `"4"`, `"4 people"`, `"4人"` -> 4
fn leading_number(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok().filter(|n| *n > 0)
}
