// Loads product price files into the catalog and exports it back out
use std::io::Write;

use crate::config::settings::ImporterSettings;
use crate::data::catalog::ProductCatalog;
use crate::data::csv_parser::{CsvLayout, ProductCsvParser};
use crate::error::ImportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub layout: Option<CsvLayout>,
    pub imported: usize,
    pub skipped: usize,
    pub replaced: usize,
}

pub struct ImportService {
    settings: ImporterSettings,
    catalog: ProductCatalog,
}

impl ImportService {
    pub fn new(settings: ImporterSettings) -> Result<Self, ImportError> {
        settings.validate()?;
        Ok(ImportService {
            settings,
            catalog: ProductCatalog::new(),
        })
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn load_csv(&mut self, file_path: &str) -> Result<LoadSummary, ImportError> {
        tracing::info!(path = %file_path, "Loading product prices");
        let parser = ProductCsvParser::new(self.settings.input_delimiter_byte()?);
        let report = parser
            .load_products_from_csv(file_path)
            .map_err(into_import_error)?;

        let mut products = report.products;
        let parsed = products.len();
        if self.settings.skip_inactive {
            products.retain(|p| p.active);
        }
        let inactive = parsed - products.len();
        let imported = products.len();
        let replaced = self.catalog.add_products(products);

        let summary = LoadSummary {
            layout: report.layout,
            imported,
            skipped: report.skipped + inactive,
            replaced,
        };
        tracing::info!(
            path = %file_path,
            imported = summary.imported,
            skipped = summary.skipped,
            replaced = summary.replaced,
            catalog_size = self.catalog.len(),
            "Finished loading product prices"
        );
        Ok(summary)
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), ImportError> {
        self.catalog
            .write_csv(writer, self.settings.output_delimiter_byte()?)
    }
}

// Keeps typed errors raised inside the parser instead of wrapping them twice.
fn into_import_error(err: anyhow::Error) -> ImportError {
    err.downcast::<ImportError>().unwrap_or_else(ImportError::from)
}
