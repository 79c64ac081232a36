//! Receipt template types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::PrintJobError;

/// Receipt variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    /// Customer receipt with everything
    #[default]
    Full,
    /// Driver slip: address, contact and amount due up front
    Delivery,
    /// Kitchen ticket: items only, large print
    Kitchen,
}

impl TemplateType {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::Full => "full",
            TemplateType::Delivery => "delivery",
            TemplateType::Kitchen => "kitchen",
        }
    }
}

impl FromStr for TemplateType {
    type Err = PrintJobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" | "default" => Ok(TemplateType::Full),
            "delivery" => Ok(TemplateType::Delivery),
            "kitchen" => Ok(TemplateType::Kitchen),
            other => Err(PrintJobError::InvalidTemplate(format!(
                "Unknown template: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TemplateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which sections a template prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub template_id: String,
    pub template_name: String,
    pub template_type: TemplateType,

    pub show_store_info: bool,
    pub show_order_info: bool,
    pub show_customer_info: bool,
    pub show_delivery_info: bool,
    pub show_item_details: bool,
    pub show_item_prices: bool,
    pub show_order_notes: bool,
    pub show_totals: bool,
    pub show_payment_info: bool,
    pub show_footer: bool,
    /// Item lines in double size (kitchen)
    pub large_items: bool,
    pub footer_text: String,
}

impl TemplateConfig {
    /// Preset for a variant
    pub fn preset(template_type: TemplateType) -> Self {
        let full = Self {
            template_id: "full".into(),
            template_name: "Full receipt".into(),
            template_type,
            show_store_info: true,
            show_order_info: true,
            show_customer_info: true,
            show_delivery_info: true,
            show_item_details: true,
            show_item_prices: true,
            show_order_notes: true,
            show_totals: true,
            show_payment_info: true,
            show_footer: true,
            large_items: false,
            footer_text: "Thank you for your order!".into(),
        };

        match template_type {
            TemplateType::Full => full,
            TemplateType::Delivery => Self {
                template_id: "delivery".into(),
                template_name: "Delivery slip".into(),
                show_item_details: false,
                footer_text: "Please check your order on arrival".into(),
                ..full
            },
            TemplateType::Kitchen => Self {
                template_id: "kitchen".into(),
                template_name: "Kitchen ticket".into(),
                show_store_info: false,
                show_customer_info: false,
                show_item_prices: false,
                show_totals: false,
                show_payment_info: false,
                show_footer: false,
                large_items: true,
                footer_text: String::new(),
                ..full
            },
        }
    }

    /// Non-blank id and name, and at least one section enabled
    pub fn is_valid(&self) -> bool {
        let any_section = self.show_store_info
            || self.show_order_info
            || self.show_customer_info
            || self.show_delivery_info
            || self.show_item_details
            || self.show_item_prices
            || self.show_order_notes
            || self.show_totals
            || self.show_payment_info
            || self.show_footer;
        !self.template_id.trim().is_empty() && !self.template_name.trim().is_empty() && any_section
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self::preset(TemplateType::Full)
    }
}
