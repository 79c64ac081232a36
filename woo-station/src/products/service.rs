//! Product service
//!
//! 商品缓存在内存里（DashMap），启动时预热一次，之后按需刷新。
//! 价格和库存修改直接写到 WooCommerce，成功后用返回值更新缓存。

use dashmap::DashMap;
use rust_decimal::Decimal;
use shared::dto::{CategoryDto, ProductDto, ProductUpdate};
use shared::money::parse_amount_opt;
use std::sync::Arc;
use tracing::{info, instrument};
use woo_client::query::{MAX_PER_PAGE, page_size};
use woo_client::{CategoryQuery, ProductQuery, WooClient};

use crate::core::{Result, StationError};

/// Product statuses accepted by WooCommerce
const PRODUCT_STATUSES: &[&str] = &["publish", "draft", "pending", "private"];

#[derive(Clone)]
pub struct ProductService {
    client: WooClient,
    products: Arc<DashMap<u64, ProductDto>>,
    categories: Arc<DashMap<u64, CategoryDto>>,
}

impl ProductService {
    pub fn new(client: WooClient) -> Self {
        Self {
            client,
            products: Arc::new(DashMap::new()),
            categories: Arc::new(DashMap::new()),
        }
    }

    /// Reload every product and category; returns the product count
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize> {
        let mut products = Vec::new();
        let mut page = 1;
        loop {
            let query = ProductQuery {
                per_page: MAX_PER_PAGE,
                ..Default::default()
            }
            .page(page);
            let batch = self.client.list_products(&query).await?;
            let last = (batch.len() as u32) < MAX_PER_PAGE;
            products.extend(batch);
            if last {
                break;
            }
            page += 1;
        }

        let mut categories = Vec::new();
        let mut page = 1;
        loop {
            let query = CategoryQuery {
                page,
                ..Default::default()
            };
            let batch = self.client.list_categories(&query).await?;
            let last = (batch.len() as u32) < page_size(query.per_page);
            categories.extend(batch);
            if last {
                break;
            }
            page += 1;
        }

        self.products.clear();
        for p in products {
            self.products.insert(p.id, p);
        }
        self.categories.clear();
        for c in categories {
            self.categories.insert(c.id, c);
        }

        info!(
            products = self.products.len(),
            categories = self.categories.len(),
            "Product cache refreshed"
        );
        Ok(self.products.len())
    }

    /// Cached products sorted by name, optionally in one category and/or
    /// matching a case-insensitive name or SKU search
    pub fn list(&self, category: Option<u64>, search: Option<&str>) -> Vec<ProductDto> {
        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut products: Vec<ProductDto> = self
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.categories.iter().any(|r| r.id == c)))
            .filter(|p| {
                needle.as_deref().is_none_or(|n| {
                    p.name.to_lowercase().contains(n) || p.sku.to_lowercase().contains(n)
                })
            })
            .map(|p| p.value().clone())
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        products
    }

    pub fn categories(&self) -> Vec<CategoryDto> {
        let mut categories: Vec<CategoryDto> =
            self.categories.iter().map(|c| c.value().clone()).collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    pub fn get(&self, id: u64) -> Option<ProductDto> {
        self.products.get(&id).map(|p| p.value().clone())
    }

    /// Set the regular price and optionally a sale price (empty clears it)
    pub async fn update_price(
        &self,
        id: u64,
        regular: &str,
        sale: Option<&str>,
    ) -> Result<ProductDto> {
        let regular = normalize_price(regular)?
            .ok_or_else(|| StationError::Validation("Regular price is required".into()))?;
        let mut update = ProductUpdate::default().with_regular_price(regular.to_string());
        if let Some(sale) = sale {
            match normalize_price(sale)? {
                Some(sale_price) if sale_price >= regular => {
                    return Err(StationError::Validation(format!(
                        "Sale price {} must be below regular price {}",
                        sale_price, regular
                    )));
                }
                Some(sale_price) => update = update.with_sale_price(sale_price.to_string()),
                None => update = update.with_sale_price(""),
            }
        }
        self.apply(id, &update).await
    }

    pub async fn update_stock(&self, id: u64, quantity: i64) -> Result<ProductDto> {
        if quantity < 0 {
            return Err(StationError::Validation(format!(
                "Stock quantity cannot be negative: {}",
                quantity
            )));
        }
        self.apply(id, &ProductUpdate::default().with_stock_quantity(quantity))
            .await
    }

    pub async fn set_status(&self, id: u64, status: &str) -> Result<ProductDto> {
        let status = status.trim().to_lowercase();
        if !PRODUCT_STATUSES.contains(&status.as_str()) {
            return Err(StationError::Validation(format!(
                "Unknown product status: {}",
                status
            )));
        }
        self.apply(id, &ProductUpdate::default().with_status(status))
            .await
    }

    #[instrument(skip(self, update))]
    async fn apply(&self, id: u64, update: &ProductUpdate) -> Result<ProductDto> {
        let product = self
            .client
            .update_product(id, update)
            .await
            .map_err(|e| StationError::for_resource(e, "Product", id))?;
        info!(product_id = id, name = %product.name, "Product updated");
        self.products.insert(product.id, product.clone());
        Ok(product)
    }
}

/// Two-decimal price; `Ok(None)` for a blank input
fn normalize_price(raw: &str) -> Result<Option<Decimal>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let price = parse_amount_opt(raw)
        .ok_or_else(|| StationError::Validation(format!("Invalid price: {:?}", raw)))?;
    if price.is_sign_negative() {
        return Err(StationError::Validation(format!(
            "Price cannot be negative: {}",
            raw
        )));
    }
    Ok(Some(price.round_dp(2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use woo_client::ClientConfig;

    fn service() -> ProductService {
        let client = ClientConfig::new("http://127.0.0.1:9", "ck_test", "cs_test")
            .build()
            .unwrap();
        ProductService::new(client)
    }

    fn product(id: u64, name: &str, sku: &str, category: u64) -> ProductDto {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "sku": sku,
            "categories": [{"id": category, "name": "c"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_list_filters_cache() {
        let svc = service();
        svc.products.insert(1, product(1, "Spring Rolls", "SR-1", 10));
        svc.products.insert(2, product(2, "Beef Noodles", "BN-2", 20));
        svc.products.insert(3, product(3, "Chicken Noodles", "CN-3", 20));

        let names: Vec<String> = svc.list(None, None).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Beef Noodles", "Chicken Noodles", "Spring Rolls"]);

        assert_eq!(svc.list(Some(20), None).len(), 2);
        assert_eq!(svc.list(Some(20), Some("beef")).len(), 1);
        assert_eq!(svc.list(None, Some("sr-1")).len(), 1);
        assert_eq!(svc.list(None, Some("  ")).len(), 3);
        assert_eq!(svc.get(3).map(|p| p.sku), Some("CN-3".into()));
    }

    #[test]
    fn test_normalize_price() {
        assert_eq!(
            normalize_price("9.999").unwrap(),
            Some(Decimal::from_str("10.00").unwrap())
        );
        assert_eq!(normalize_price(" ").unwrap(), None);
        assert!(normalize_price("abc").is_err());
        assert!(normalize_price("-1").is_err());
    }

    #[tokio::test]
    async fn test_invalid_updates_rejected_before_request() {
        let svc = service();
        assert!(matches!(
            svc.update_price(1, "5.00", Some("6.00")).await,
            Err(StationError::Validation(_))
        ));
        assert!(matches!(
            svc.update_stock(1, -2).await,
            Err(StationError::Validation(_))
        ));
        assert!(matches!(
            svc.set_status(1, "archived").await,
            Err(StationError::Validation(_))
        ));
    }
}
