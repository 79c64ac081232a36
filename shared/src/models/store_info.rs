//! Store Info Model

use serde::{Deserialize, Serialize};

/// Store details printed in receipt headers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub phone: Option<String>,
    /// Prefix for printed amounts, e.g. `$`
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            phone: None,
            currency_symbol: default_currency_symbol(),
        }
    }
}
