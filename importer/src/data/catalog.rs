// In-memory product catalog keyed by product name
use csv::WriterBuilder;
use pricing::models::ProductPrice;
use std::collections::HashMap;
use std::io::Write;

use crate::error::ImportError;

const EXPORT_HEADER: [&str; 7] = [
    "name",
    "description",
    "price",
    "base_price",
    "profit",
    "exempt",
    "active",
];

#[derive(Debug, Default)]
pub struct ProductCatalog {
    // Keyed by trimmed, lowercased name so "Café" and " café " collide.
    products: HashMap<String, ProductPrice>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        ProductCatalog {
            products: HashMap::new(),
        }
    }

    /// Inserts products, replacing existing entries with the same name.
    /// Returns how many entries were replaced.
    pub fn add_products(&mut self, new_products: Vec<ProductPrice>) -> usize {
        let mut replaced = 0;
        for product in new_products {
            if self.products.insert(catalog_key(&product.name), product).is_some() {
                replaced += 1;
            }
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&ProductPrice> {
        self.products.get(&catalog_key(name))
    }

    /// All products ordered by name.
    pub fn products_sorted(&self) -> Vec<&ProductPrice> {
        let mut sorted: Vec<_> = self.products.values().collect();
        sorted.sort_by_key(|p| catalog_key(&p.name));
        sorted
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Writes the catalog as CSV with Colombian formatted money columns.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), ImportError> {
        let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
        wtr.write_record(EXPORT_HEADER)?;
        for product in self.products_sorted() {
            let price = product.formatted_price();
            let base_price = product.formatted_base_price();
            let profit = product.formatted_profit();
            wtr.write_record([
                product.name.as_str(),
                product.description.as_str(),
                price.as_str(),
                base_price.as_str(),
                profit.as_str(),
                yes_no(product.exempt),
                yes_no(product.active),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn catalog_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "si"
    } else {
        "no"
    }
}
