//! List query parameters

use chrono::NaiveDateTime;
use shared::util::format_woo_datetime;

/// WooCommerce caps `per_page` at 100
pub const MAX_PER_PAGE: u32 = 100;

type Params = Vec<(&'static str, String)>;

/// `per_page` as actually sent
pub fn page_size(per_page: u32) -> u32 {
    per_page.clamp(1, MAX_PER_PAGE)
}

fn paging(page: u32, per_page: u32) -> Params {
    vec![
        ("page", page.max(1).to_string()),
        ("per_page", page_size(per_page).to_string()),
    ]
}

/// `GET /orders` filter
#[derive(Debug, Clone)]
pub struct OrderQuery {
    pub page: u32,
    pub per_page: u32,
    /// Comma-separated statuses, e.g. `processing,on-hold`
    pub status: Option<String>,
    /// Created after (store local time)
    pub after: Option<NaiveDateTime>,
    /// Modified after (store local time)
    pub modified_after: Option<NaiveDateTime>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            status: None,
            after: None,
            modified_after: None,
        }
    }
}

impl OrderQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn after(mut self, after: NaiveDateTime) -> Self {
        self.after = Some(after);
        self
    }

    pub fn modified_after(mut self, after: NaiveDateTime) -> Self {
        self.modified_after = Some(after);
        self
    }

    pub fn to_params(&self) -> Params {
        let mut params = paging(self.page, self.per_page);
        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("status", status.trim().to_string()));
        }
        if let Some(after) = self.after {
            params.push(("after", format_woo_datetime(after)));
        }
        if let Some(after) = self.modified_after {
            params.push(("modified_after", format_woo_datetime(after)));
        }
        params.push(("orderby", "date".to_string()));
        params.push(("order", "desc".to_string()));
        params
    }
}

/// `GET /products` filter
#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub category: Option<u64>,
    pub status: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
            search: None,
            category: None,
            status: None,
        }
    }
}

impl ProductQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, id: u64) -> Self {
        self.category = Some(id);
        self
    }

    pub fn to_params(&self) -> Params {
        let mut params = paging(self.page, self.per_page);
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("search", search.trim().to_string()));
        }
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(status) = &self.status {
            params.push(("status", status.clone()));
        }
        params
    }
}

/// `GET /products/categories` filter
#[derive(Debug, Clone)]
pub struct CategoryQuery {
    pub page: u32,
    pub per_page: u32,
    pub hide_empty: bool,
}

impl Default for CategoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: MAX_PER_PAGE,
            hide_empty: false,
        }
    }
}

impl CategoryQuery {
    pub fn to_params(&self) -> Params {
        let mut params = paging(self.page, self.per_page);
        if self.hide_empty {
            params.push(("hide_empty", "true".to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn get<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_order_query_params() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let params = OrderQuery::default()
            .per_page(500)
            .status("processing")
            .modified_after(at)
            .to_params();
        assert_eq!(get(&params, "per_page"), Some("100"));
        assert_eq!(get(&params, "page"), Some("1"));
        assert_eq!(get(&params, "status"), Some("processing"));
        assert_eq!(get(&params, "modified_after"), Some("2024-03-05T09:30:00"));
        assert_eq!(get(&params, "after"), None);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(page_size(0), 1);
        assert_eq!(page_size(50), 50);
        assert_eq!(page_size(500), MAX_PER_PAGE);
        let params = OrderQuery::default().per_page(0).to_params();
        assert_eq!(get(&params, "per_page"), Some("1"));
    }

    #[test]
    fn test_blank_filters_are_omitted() {
        let params = ProductQuery::default().search("  ").page(0).to_params();
        assert_eq!(get(&params, "search"), None);
        assert_eq!(get(&params, "page"), Some("1"));
    }

    #[test]
    fn test_category_query() {
        let params = CategoryQuery {
            hide_empty: true,
            ..Default::default()
        }
        .to_params();
        assert_eq!(get(&params, "hide_empty"), Some("true"));
    }
}
