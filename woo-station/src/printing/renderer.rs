//! Receipt renderer
//!
//! Renders an [`Order`] into receipt markup for one of the template
//! variants. The markup is vendor-neutral; the sender encodes it for
//! ESC/POS or Star and appends the cut sequence.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{FeeKind, Order, OrderItem, StoreInfo};
use shared::money::format_amount;
use shared::woofood::{OrderMethod, ScheduleStatus, relative_day_label, schedule_status};
use woo_printer::layout::display_width;
use woo_printer::{Align, ItemColumns, MarkupBuilder, PrinterProfile, TextStyle};

use super::types::{TemplateConfig, TemplateType};

/// Blank lines fed after the footer so the last line clears the cutter
const TRAILING_FEED_LINES: usize = 3;

const DOUBLE_HEIGHT_BOLD: TextStyle = TextStyle {
    bold: true,
    underline: false,
    double_width: false,
    double_height: true,
};

/// Receipt renderer for one paper width and store
pub struct ReceiptRenderer {
    width: usize,
    store: StoreInfo,
    timezone: Tz,
}

impl ReceiptRenderer {
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize, store: StoreInfo, timezone: Tz) -> Self {
        Self {
            width,
            store,
            timezone,
        }
    }

    pub fn for_profile(profile: &PrinterProfile, store: StoreInfo, timezone: Tz) -> Self {
        Self::new(profile.chars_per_line(), store, timezone)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render an order, stamped with the current time
    pub fn render(&self, order: &Order, template: &TemplateConfig) -> String {
        self.render_at(order, template, Utc::now())
    }

    /// Render an order with an explicit print time
    pub fn render_at(
        &self,
        order: &Order,
        template: &TemplateConfig,
        printed_at: DateTime<Utc>,
    ) -> String {
        let mut b = MarkupBuilder::new(self.width);

        if template.show_store_info {
            self.render_store_header(&mut b);
        }
        self.render_method_banner(&mut b, order);
        if template.show_order_info {
            self.render_order_info(&mut b, order, printed_at);
        }

        // 配送单: 地址和联系人放在最前面
        match template.template_type {
            TemplateType::Delivery => {
                if template.show_delivery_info {
                    self.render_fulfilment(&mut b, order);
                }
                if template.show_customer_info {
                    self.render_customer(&mut b, order);
                }
            }
            TemplateType::Full | TemplateType::Kitchen => {
                if template.show_customer_info {
                    self.render_customer(&mut b, order);
                }
                if template.show_delivery_info {
                    self.render_fulfilment(&mut b, order);
                }
            }
        }

        b.sep_double();
        self.render_items(&mut b, order, template);

        if template.show_totals {
            b.sep_single();
            self.render_totals(&mut b, order);
        }
        if template.show_payment_info {
            b.left_right("Payment:", &order.payment_method);
        }
        if template.show_order_notes {
            self.render_notes(&mut b, order);
        }
        if template.show_footer && !template.footer_text.trim().is_empty() {
            b.sep_single();
            for part in woo_printer::layout::wrap_columns(template.footer_text.trim(), self.width) {
                b.center(&part);
            }
        }

        for _ in 0..TRAILING_FEED_LINES {
            b.blank();
        }
        b.build()
    }

    fn money(&self, amount: Decimal) -> String {
        format_amount(amount, &self.store.currency_symbol)
    }

    fn render_store_header(&self, b: &mut MarkupBuilder) {
        if !self.store.name.trim().is_empty() {
            b.styled(Align::Center, TextStyle::BIG, self.store.name.trim());
        }
        if !self.store.address.trim().is_empty() {
            for part in woo_printer::layout::wrap_columns(self.store.address.trim(), self.width) {
                b.center(&part);
            }
        }
        if let Some(phone) = self.store.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            b.center(&format!("Tel: {}", phone.trim()));
        }
        b.sep_double();
    }

    fn render_method_banner(&self, b: &mut MarkupBuilder, order: &Order) {
        b.styled(Align::Center, TextStyle::BIG, order.meta.method().label());

        let status = match order.created_at {
            Some(created) => schedule_status(
                created,
                order.meta.delivery_date,
                order.meta.time_window_start,
            ),
            None => ScheduleStatus::Unknown,
        };
        match status {
            ScheduleStatus::Urgent => {
                b.styled(Align::Center, TextStyle::BOLD, "** URGENT **");
            }
            ScheduleStatus::PreOrder { days_ahead } => {
                let label = format!("PRE-ORDER: {}", relative_day_label(days_ahead));
                b.styled(Align::Center, TextStyle::BOLD, &label);
            }
            ScheduleStatus::Today | ScheduleStatus::Unknown => {}
        }
    }

    fn render_order_info(&self, b: &mut MarkupBuilder, order: &Order, printed_at: DateTime<Utc>) {
        b.left_right_styled("Order", &format!("#{}", order.number), TextStyle::BOLD);
        if let Some(created) = order.created_at {
            b.left_right("Placed:", &created.format("%Y-%m-%d %H:%M").to_string());
        }
        let printed = printed_at.with_timezone(&self.timezone);
        b.left_right("Printed:", &printed.format("%Y-%m-%d %H:%M").to_string());
    }

    fn render_customer(&self, b: &mut MarkupBuilder, order: &Order) {
        b.sep_single();
        b.left_right("Customer:", &order.customer_name);
        if let Some(phone) = &order.customer_phone {
            b.left_right("Phone:", phone);
        }
    }

    /// Delivery block, or the pickup/dine-in schedule
    fn render_fulfilment(&self, b: &mut MarkupBuilder, order: &Order) {
        let meta = &order.meta;
        let date = meta.delivery_date_str();
        let time = meta.delivery_time.as_deref().filter(|t| !t.trim().is_empty());

        if meta.is_delivery {
            b.sep_single();
            b.styled(Align::Left, TextStyle::BOLD, "DELIVER TO:");
            match order.delivery_address() {
                Some(address) => {
                    b.wrapped(address);
                }
                None => {
                    b.left("(no address)");
                }
            }
            if let Some(date) = &date {
                b.left_right("Delivery date:", date);
            }
            if let Some(time) = time {
                b.left_right("Delivery time:", time.trim());
            }
            return;
        }

        if date.is_none() && time.is_none() && meta.party_size.is_none() {
            return;
        }
        b.sep_single();
        let (date_label, time_label) = match meta.method() {
            OrderMethod::DineIn => ("Reservation:", "Time:"),
            _ => ("Pickup date:", "Pickup time:"),
        };
        if let Some(date) = &date {
            b.left_right(date_label, date);
        }
        if let Some(time) = time {
            b.left_right(time_label, time.trim());
        }
        if let Some(guests) = meta.party_size {
            b.left_right("Guests:", &guests.to_string());
        }
    }

    fn render_items(&self, b: &mut MarkupBuilder, order: &Order, template: &TemplateConfig) {
        if order.items.is_empty() {
            b.center("(no items)");
            return;
        }

        if template.large_items {
            for item in &order.items {
                self.render_large_item(b, item, template.show_item_details);
            }
            b.sep_single();
            b.left_right_styled("Items:", &order.item_count().to_string(), TextStyle::BOLD);
            return;
        }

        let prices: Vec<String> = order
            .items
            .iter()
            .map(|item| {
                if template.show_item_prices {
                    self.money(item.total)
                } else {
                    String::new()
                }
            })
            .collect();
        let widest = prices.iter().map(|p| display_width(p)).max().unwrap_or(0);
        let cols = ItemColumns::for_width(self.width).with_price_width(widest);
        if template.show_item_prices {
            b.styled(Align::Left, TextStyle::BOLD, &cols.header());
        }
        for (item, price) in order.items.iter().zip(&prices) {
            for row in cols.row(&item.quantity.to_string(), &item.name, price) {
                b.left(row.trim_end());
            }
            if template.show_item_details {
                for option in &item.options {
                    let text = format!("- {}: {}", option.name, option.value);
                    self.indented(b, cols.qty, &text);
                }
            }
        }
    }

    /// Kitchen line: `2 x Name` in double height
    fn render_large_item(&self, b: &mut MarkupBuilder, item: &OrderItem, details: bool) {
        let line = format!("{} x {}", item.quantity, item.name);
        for part in woo_printer::layout::wrap_columns(&line, self.width) {
            b.styled(Align::Left, DOUBLE_HEIGHT_BOLD, &part);
        }
        if details {
            for option in &item.options {
                self.indented(b, 3, &format!("- {}: {}", option.name, option.value));
            }
        }
    }

    /// Wrapped text with every line indented
    fn indented(&self, b: &mut MarkupBuilder, indent: usize, text: &str) {
        let pad = " ".repeat(indent);
        for part in woo_printer::layout::wrap_columns(text, self.width.saturating_sub(indent)) {
            b.left(&format!("{}{}", pad, part));
        }
    }

    fn render_totals(&self, b: &mut MarkupBuilder, order: &Order) {
        b.left_right("Subtotal:", &self.money(order.subtotal));
        if !order.discount_total.is_zero() {
            b.left_right("Discount:", &self.money(-order.discount_total.abs()));
        }
        // 配送费在前，小费最后
        let mut fees: Vec<_> = order.fee_lines.iter().filter(|f| !f.amount.is_zero()).collect();
        fees.sort_by_key(|f| match f.kind {
            FeeKind::Delivery => 0,
            FeeKind::Other => 1,
            FeeKind::Tip => 2,
        });
        for fee in fees {
            let name = if fee.name.is_empty() {
                match fee.kind {
                    FeeKind::Delivery => "Delivery fee",
                    FeeKind::Tip => "Tip",
                    FeeKind::Other => "Fee",
                }
            } else {
                fee.name.as_str()
            };
            b.left_right(&format!("{}:", name), &self.money(fee.amount));
        }
        for tax in order.tax_lines.iter().filter(|t| !t.amount.is_zero()) {
            let label = match tax.rate_percent {
                Some(rate) => format!("{} ({}%):", tax.label, rate.normalize()),
                None => format!("{}:", tax.label),
            };
            b.left_right(&label, &self.money(tax.amount));
        }
        b.left_right_styled("TOTAL:", &self.money(order.total), DOUBLE_HEIGHT_BOLD);
    }

    fn render_notes(&self, b: &mut MarkupBuilder, order: &Order) {
        if let Some(note) = order.customer_note.as_deref().filter(|n| !n.trim().is_empty()) {
            b.sep_single();
            b.styled(Align::Left, TextStyle::BOLD, "Note:");
            for line in note.lines().filter(|l| !l.trim().is_empty()) {
                b.wrapped(line.trim());
            }
        }
    }

    /// Printer test page
    pub fn render_test_page(
        &self,
        profile: &PrinterProfile,
        target: &str,
        printed_at: DateTime<Utc>,
    ) -> String {
        let mut b = MarkupBuilder::new(self.width);
        let store_name = if self.store.name.trim().is_empty() {
            "Woo Station"
        } else {
            self.store.name.trim()
        };

        b.styled(Align::Center, TextStyle::BIG, store_name);
        b.styled(Align::Center, TextStyle::BOLD, "PRINTER TEST PAGE");
        b.sep_double();

        b.left_right("Printer:", profile.vendor.as_str());
        b.left_right("Address:", target);
        b.left_right(
            "Paper width:",
            &format!(
                "{}mm ({} chars)",
                profile.paper_width.mm(),
                profile.chars_per_line()
            ),
        );
        let printed = printed_at.with_timezone(&self.timezone);
        b.left_right("Time:", &printed.format("%Y-%m-%d %H:%M:%S").to_string());
        b.sep_single();

        b.left("Normal text");
        b.styled(Align::Left, TextStyle::BOLD, "Bold text");
        b.styled(
            Align::Left,
            TextStyle {
                underline: true,
                ..TextStyle::default()
            },
            "Underlined text",
        );
        b.styled(Align::Left, DOUBLE_HEIGHT_BOLD, "Double height");
        b.sep_single();

        b.line(Align::Left, "Left aligned");
        b.line(Align::Center, "Centered");
        b.line(Align::Right, "Right aligned");
        b.sep_single();

        b.left("中文测试: 宫保鸡丁 x2");
        b.left("0123456789");
        b.left_right("Item", &self.money(Decimal::new(1250, 2)));
        b.sep_double();

        b.styled(Align::Center, TextStyle::BOLD, "Test complete");
        for _ in 0..TRAILING_FEED_LINES {
            b.blank();
        }
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use shared::models::{FeeLine, ItemOption, OrderStatus, TaxLine};
    use shared::woofood::NormalizedOrderMeta;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn store() -> StoreInfo {
        StoreInfo {
            name: "Golden Dragon".into(),
            address: "12 Market Street".into(),
            phone: Some("555-0100".into()),
            currency_symbol: "$".into(),
        }
    }

    fn renderer() -> ReceiptRenderer {
        ReceiptRenderer::new(48, store(), chrono_tz::UTC)
    }

    fn printed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn order() -> Order {
        Order {
            id: 1024,
            number: "1024".into(),
            status: OrderStatus::Processing,
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1).and_then(|d| d.and_hms_opt(12, 0, 0)),
            modified_at: None,
            currency: "USD".into(),
            customer_name: "Ada Lovelace".into(),
            customer_phone: Some("555-0199".into()),
            customer_note: Some("Ring twice".into()),
            billing_address: Some("1 Billing Rd".into()),
            shipping_address: Some("7 Harbour Lane, Springfield".into()),
            payment_method: "Cash on delivery".into(),
            items: vec![
                OrderItem {
                    product_id: 1,
                    name: "Dumplings".into(),
                    quantity: 2,
                    unit_price: d("6"),
                    total: d("12"),
                    options: vec![ItemOption {
                        name: "Spice".into(),
                        value: "Mild".into(),
                    }],
                },
                OrderItem {
                    product_id: 2,
                    name: "宫保鸡丁".into(),
                    quantity: 1,
                    unit_price: d("9.5"),
                    total: d("9.5"),
                    options: vec![],
                },
            ],
            fee_lines: vec![
                FeeLine {
                    name: "Tip".into(),
                    amount: d("2"),
                    kind: FeeKind::Tip,
                },
                FeeLine {
                    name: "Delivery fee".into(),
                    amount: d("3.5"),
                    kind: FeeKind::Delivery,
                },
            ],
            tax_lines: vec![TaxLine {
                label: "VAT".into(),
                rate_percent: Some(d("10.00")),
                amount: d("2.15"),
            }],
            subtotal: d("21.5"),
            discount_total: Decimal::ZERO,
            total_tax: d("2.15"),
            total: d("29.15"),
            meta: NormalizedOrderMeta {
                order_method: "delivery".into(),
                delivery_date: NaiveDate::from_ymd_opt(2024, 5, 3),
                delivery_time: Some("18:00 - 18:30".into()),
                is_delivery: true,
                delivery_fee: Some(d("3.5")),
                tip: Some(d("2")),
                time_window_start: chrono::NaiveTime::from_hms_opt(18, 0, 0),
                ..Default::default()
            },
        }
    }

    fn render(template: TemplateType, order: &Order) -> String {
        renderer().render_at(order, &TemplateConfig::preset(template), printed_at())
    }

    #[test]
    fn test_every_line_has_alignment_prefix() {
        let out = render(TemplateType::Full, &order());
        for line in out.lines() {
            assert!(
                line.starts_with("[L]") || line.starts_with("[C]") || line.starts_with("[R]"),
                "bad line: {:?}",
                line
            );
        }
    }

    #[test]
    fn test_full_receipt_sections() {
        let out = render(TemplateType::Full, &order());

        assert!(out.contains("[C]<b><w><h>Golden Dragon</h></w></b>"));
        assert!(out.contains("Tel: 555-0100"));
        assert!(out.contains("DELIVERY"));
        assert!(out.contains("PRE-ORDER: Day after tomorrow"));
        assert!(out.contains("#1024"));
        assert!(out.contains("DELIVER TO:"));
        assert!(out.contains("7 Harbour Lane, Springfield"));
        assert!(out.contains("2024-05-03"));
        assert!(out.contains("- Spice: Mild"));
        assert!(out.contains("$12.00"));
        assert!(out.contains("VAT (10%):"));
        assert!(out.contains("$29.15"));
        assert!(out.contains("Ring twice"));
        assert!(out.contains("Thank you for your order!"));

        // 配送费在小费之前
        let delivery = out.find("Delivery fee:").unwrap();
        let tip = out.find("Tip:").unwrap();
        assert!(delivery < tip);
    }

    #[test]
    fn test_kitchen_ticket_hides_money() {
        let out = render(TemplateType::Kitchen, &order());

        assert!(!out.contains('$'));
        assert!(!out.contains("Golden Dragon"));
        assert!(!out.contains("Ada Lovelace"));
        assert!(!out.contains("Payment:"));
        assert!(out.contains("<b><h>2 x Dumplings</h></b>"));
        assert!(out.contains("Items:"));
        assert!(out.contains("Ring twice"));
    }

    #[test]
    fn test_delivery_slip_puts_address_before_customer() {
        let out = render(TemplateType::Delivery, &order());

        let address = out.find("DELIVER TO:").unwrap();
        let customer = out.find("Customer:").unwrap();
        assert!(address < customer);
        assert!(!out.contains("Spice"));
        assert!(out.contains("Please check your order on arrival"));
    }

    #[test]
    fn test_pickup_order_has_no_delivery_block() {
        let mut o = order();
        o.meta = NormalizedOrderMeta {
            order_method: "pickup".into(),
            delivery_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            delivery_time: Some("13:30".into()),
            time_window_start: chrono::NaiveTime::from_hms_opt(13, 30, 0),
            ..Default::default()
        };
        let out = render(TemplateType::Full, &o);

        assert!(out.contains("PICKUP"));
        assert!(!out.contains("DELIVER TO:"));
        assert!(out.contains("Pickup time:"));
        assert!(out.contains("** URGENT **"));
    }

    #[test]
    fn test_narrow_paper_fits_columns() {
        let r = ReceiptRenderer::new(32, store(), chrono_tz::UTC);
        let out = r.render_at(&order(), &TemplateConfig::default(), printed_at());
        for line in woo_printer::parse_markup(&out) {
            let text = line.plain_text();
            let doubled = line.spans.iter().any(|s| s.style.double_width);
            if !doubled {
                assert!(
                    display_width(&text) <= 32,
                    "too wide: {:?}",
                    text
                );
            }
        }
    }

    #[test]
    fn test_narrow_paper_keeps_large_prices_whole() {
        let mut o = order();
        o.items = vec![OrderItem {
            product_id: 9,
            name: "Party tray".into(),
            quantity: 10,
            unit_price: d("123.45"),
            total: d("1234.50"),
            options: vec![],
        }];
        let r = ReceiptRenderer::new(32, store(), chrono_tz::UTC);
        let out = r.render_at(&o, &TemplateConfig::default(), printed_at());

        let row = out
            .lines()
            .find(|l| l.contains("Party tray"))
            .unwrap();
        assert!(row.ends_with(" $1234.50"), "row: {:?}", row);
        assert!(display_width(row.trim_start_matches("[L]")) <= 32);
    }

    #[test]
    fn test_test_page() {
        let profile = PrinterProfile::default();
        let out = renderer().render_test_page(&profile, "192.168.1.50:9100", printed_at());

        assert!(out.contains("PRINTER TEST PAGE"));
        assert!(out.contains("192.168.1.50:9100"));
        assert!(out.contains("80mm (48 chars)"));
        assert!(out.contains("[R]Right aligned"));
        assert!(out.contains("中文测试"));
        assert!(out.contains("2024-05-01 12:30:00"));
    }
}
