//! Column layout helpers for fixed-width receipt text
//!
//! Thermal printers lay text out on a fixed grid. CJK glyphs and full-width
//! forms take two columns, everything else one.

/// Printed width of a single character
pub fn char_columns(c: char) -> usize {
    let cp = c as u32;
    let wide = matches!(cp,
        0x4E00..=0x9FFF     // CJK unified ideographs
        | 0x3400..=0x4DBF   // CJK extension A
        | 0x3000..=0x303F   // CJK symbols and punctuation
        | 0xFF00..=0xFFEF   // half/full-width forms (includes ￥)
        | 0xFE30..=0xFE4F   // CJK compatibility forms
    );
    if wide { 2 } else { 1 }
}

/// Printed width of a string
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_columns).sum()
}

/// Cut `s` to at most `max` columns, ending with `...` when shortened
pub fn truncate_columns(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    if max <= 3 {
        return ".".repeat(max);
    }
    let mut out = take_columns(s, max - 3);
    out.push_str("...");
    out
}

/// Pad (or cut) `s` to exactly `width` columns
pub fn pad_columns(s: &str, width: usize, align_right: bool) -> String {
    let current = display_width(s);
    if current > width {
        return pad_columns(&take_columns(s, width), width, align_right);
    }
    let spaces = " ".repeat(width - current);
    if align_right {
        format!("{}{}", spaces, s)
    } else {
        format!("{}{}", s, spaces)
    }
}

/// Longest prefix of `s` that fits in `max` columns
fn take_columns(s: &str, max: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|c| {
            used += char_columns(*c);
            used <= max
        })
        .collect()
}

/// Word-wrap `s` to `width` columns.
///
/// Breaks at spaces where possible; words longer than a line (and CJK runs,
/// which have no spaces) are split by column.
pub fn wrap_columns(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_w = 0;

    for word in s.split_whitespace() {
        let word_w = display_width(word);
        let sep = usize::from(!current.is_empty());

        if current_w + sep + word_w <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_w += sep + word_w;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_w = 0;
        }

        for c in word.chars() {
            let cw = char_columns(c);
            if current_w + cw > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_w = 0;
            }
            current.push(c);
            current_w += cw;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Left text and right text on one line, or on two lines when they do not
/// fit together (right text then right-aligned on its own line)
pub fn left_right(left: &str, right: &str, width: usize) -> Vec<String> {
    let lw = display_width(left);
    let rw = display_width(right);
    if lw + rw < width {
        return vec![format!("{}{}{}", left, " ".repeat(width - lw - rw), right)];
    }
    vec![left.to_string(), pad_columns(right, width.max(rw), true)]
}

/// Column split for `qty | name | price` item rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemColumns {
    pub qty: usize,
    pub name: usize,
    pub price: usize,
}

impl ItemColumns {
    /// Columns for a line width; one space separates name and price
    pub fn for_width(width: usize) -> Self {
        let qty = if width >= 42 { 4 } else { 3 };
        let price = if width >= 42 { 10 } else { 7 };
        let name = width.saturating_sub(qty + price + 1).max(1);
        Self { qty, name, price }
    }

    /// Widen the price column to `price_width`, taking the columns from the
    /// name. The name keeps at least one column.
    pub fn with_price_width(self, price_width: usize) -> Self {
        if price_width <= self.price {
            return self;
        }
        let line = self.qty + self.name + 1 + self.price;
        let price = price_width.min(line.saturating_sub(self.qty + 2));
        Self {
            qty: self.qty,
            name: line.saturating_sub(self.qty + price + 1).max(1),
            price,
        }
    }

    /// Full line width covered by the columns
    pub fn line_width(&self) -> usize {
        self.qty + self.name + 1 + self.price
    }

    /// Item row with the name wrapped under itself and the price pinned to
    /// the first line.
    ///
    /// Prices are never cut: one wider than the price column goes on its own
    /// right-aligned line after the name.
    pub fn row(&self, qty: &str, name: &str, price: &str) -> Vec<String> {
        let overflow = display_width(price) > self.price;
        let names = wrap_columns(name, self.name);
        let mut rows = Vec::with_capacity(names.len() + 1);
        for (i, part) in names.iter().enumerate() {
            let q = if i == 0 { qty } else { "" };
            let p = if i == 0 && !overflow { price } else { "" };
            rows.push(format!(
                "{}{} {}",
                pad_columns(q, self.qty, false),
                pad_columns(part, self.name, false),
                pad_columns(p, self.price, true)
            ));
        }
        if overflow {
            rows.push(pad_columns(price, self.line_width().max(display_width(price)), true));
        }
        rows
    }

    /// Column header row
    pub fn header(&self) -> String {
        format!(
            "{}{} {}",
            pad_columns("Qty", self.qty, false),
            pad_columns("Item", self.name, false),
            pad_columns("Price", self.price, true)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("AB中文CD"), 8);
        assert_eq!(display_width("￥5"), 3);
    }

    #[test]
    fn test_truncate_columns() {
        assert_eq!(truncate_columns("hello", 5), "hello");
        assert_eq!(truncate_columns("hello world", 8), "hello...");
        assert_eq!(truncate_columns("你好世界你好", 7), "你好...");
    }

    #[test]
    fn test_pad_columns() {
        assert_eq!(pad_columns("hi", 5, false), "hi   ");
        assert_eq!(pad_columns("hi", 5, true), "   hi");
        assert_eq!(pad_columns("hello world", 5, false), "hello");
        assert_eq!(pad_columns("中文字", 5, false), "中文 ");
    }

    #[test]
    fn test_wrap_columns() {
        assert_eq!(
            wrap_columns("Spicy beef noodle soup", 10),
            vec!["Spicy beef", "noodle", "soup"]
        );
        assert_eq!(wrap_columns("宫保鸡丁盖饭", 6), vec!["宫保鸡", "丁盖饭"]);
        assert_eq!(wrap_columns("", 10), vec![""]);
    }

    #[test]
    fn test_left_right() {
        assert_eq!(left_right("Total", "$5.00", 16), vec!["Total      $5.00"]);
        let lines = left_right("A very long label", "$123.00", 16);
        assert_eq!(lines, vec!["A very long label".to_string(), "         $123.00".to_string()]);
    }

    #[test]
    fn test_item_columns() {
        let cols = ItemColumns::for_width(48);
        assert_eq!(cols, ItemColumns { qty: 4, name: 33, price: 10 });
        let narrow = ItemColumns::for_width(32);
        assert_eq!(narrow, ItemColumns { qty: 3, name: 21, price: 7 });

        let rows = narrow.row("2x", "Braised pork belly with preserved greens", "$24.00");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].ends_with(" $24.00"));
        assert!(rows.iter().all(|r| display_width(r) == 32));
    }

    #[test]
    fn test_price_column_widens_for_large_amounts() {
        let cols = ItemColumns::for_width(32).with_price_width(display_width("$1234.50"));
        assert_eq!(cols, ItemColumns { qty: 3, name: 20, price: 8 });
        assert_eq!(cols.line_width(), 32);

        let rows = cols.row("10", "Party tray", "$1234.50");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].ends_with(" $1234.50"));
        assert_eq!(display_width(&rows[0]), 32);

        // 更窄的价格不会缩小列
        assert_eq!(ItemColumns::for_width(32).with_price_width(4).price, 7);
    }

    #[test]
    fn test_price_wider_than_column_is_never_cut() {
        let cols = ItemColumns::for_width(32);
        let rows = cols.row("1", "Banquet", "$123456.75");
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].contains('$'));
        assert!(rows[1].ends_with("$123456.75"));
        assert_eq!(display_width(&rows[1]), 32);
    }
}
