//! Product and category DTOs

use super::null_default;
use serde::{Deserialize, Serialize};

/// `GET /products/{id}` response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDto {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    #[serde(deserialize_with = "null_default")]
    pub sku: String,
    #[serde(deserialize_with = "null_default")]
    pub price: String,
    #[serde(deserialize_with = "null_default")]
    pub regular_price: String,
    #[serde(deserialize_with = "null_default")]
    pub sale_price: String,
    pub on_sale: bool,
    pub manage_stock: bool,
    pub stock_quantity: Option<i64>,
    #[serde(deserialize_with = "null_default")]
    pub stock_status: String,
    #[serde(deserialize_with = "null_default")]
    pub categories: Vec<CategoryRefDto>,
    #[serde(deserialize_with = "null_default")]
    pub images: Vec<ImageDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRefDto {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDto {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub src: String,
}

/// `GET /products/categories` entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDto {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub slug: String,
    pub parent: u64,
    pub count: u64,
}

/// Partial product update (`PUT /products/{id}`)
///
/// Only the fields that are `Some` are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_regular_price(mut self, price: impl Into<String>) -> Self {
        self.regular_price = Some(price.into());
        self
    }

    pub fn with_sale_price(mut self, price: impl Into<String>) -> Self {
        self.sale_price = Some(price.into());
        self
    }

    /// Set a managed stock quantity; status follows the quantity
    pub fn with_stock_quantity(mut self, quantity: i64) -> Self {
        self.manage_stock = Some(true);
        self.stock_quantity = Some(quantity);
        self.stock_status = Some(if quantity > 0 { "instock" } else { "outofstock" }.to_string());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
