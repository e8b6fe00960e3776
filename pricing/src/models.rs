use serde::{Deserialize, Serialize};

use crate::colombian_format::format_price;

/// A product with its selling price, cost and margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub base_price: f64,
    pub profit: f64,
    pub cvv: Option<String>,
    pub exempt: bool,
    pub active: bool,
}

impl ProductPrice {
    /// Product sold at cost with no margin recorded.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self::with_base_price(name, description, price, price)
    }

    pub fn with_base_price(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        base_price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            base_price,
            profit: price - base_price,
            cvv: None,
            exempt: false,
            active: true,
        }
    }

    pub fn formatted_price(&self) -> String {
        format_price(self.price)
    }

    pub fn formatted_base_price(&self) -> String {
        format_price(self.base_price)
    }

    pub fn formatted_profit(&self) -> String {
        format_price(self.profit)
    }
}
