use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use pricing::models::ProductPrice;
use std::fs::File;
use std::io::{BufReader, Read};

use crate::error::ImportError;

// Cell-level parsing for product price files
pub mod price_cell {
    use anyhow::{anyhow, Result};

    /// Reads a price cell. Cells holding a comma are Colombian ("1.234,56",
    /// "1234,56"); anything else is a plain decimal with '.' as the point.
    /// Blank cells count as zero.
    pub fn parse_price_cell(s: &str) -> Result<f64> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(0.0);
        }
        if s.contains(',') {
            return Ok(pricing::try_parse_price(s)?);
        }
        s.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| anyhow!("Failed to parse price '{}'", s))
    }

    pub fn parse_flag(s: &str) -> bool {
        matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "si" | "sí" | "1" | "yes" | "y"
        )
    }

}

/// Column layouts accepted in product price files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// id, name, description, price
    Basic,
    /// id, name, suppliers, description, price, base_price
    WithBase,
    /// name, description, price, base_price, profit, cvv, exempt, active
    Full,
}

impl CsvLayout {
    pub fn from_width(width: usize) -> Option<Self> {
        match width {
            4 => Some(CsvLayout::Basic),
            6 => Some(CsvLayout::WithBase),
            8 => Some(CsvLayout::Full),
            _ => None,
        }
    }

    pub fn width(self) -> usize {
        match self {
            CsvLayout::Basic => 4,
            CsvLayout::WithBase => 6,
            CsvLayout::Full => 8,
        }
    }

    fn parse_product(self, record: &StringRecord) -> Result<ProductPrice> {
        match self {
            CsvLayout::Basic => {
                let name = required(record, 1, "name")?;
                let price = price_cell::parse_price_cell(required(record, 3, "price")?)
                    .context("Error parsing 'price'")?;
                Ok(ProductPrice::new(name, field(record, 2), price))
            }
            CsvLayout::WithBase => {
                let name = required(record, 1, "name")?;
                let price = price_cell::parse_price_cell(required(record, 4, "price")?)
                    .context("Error parsing 'price'")?;
                let base_price = price_cell::parse_price_cell(required(record, 5, "base_price")?)
                    .context("Error parsing 'base_price'")?;
                // Suppliers column is not imported.
                Ok(ProductPrice::with_base_price(name, field(record, 3), price, base_price))
            }
            CsvLayout::Full => {
                let name = required(record, 0, "name")?;
                let price = price_cell::parse_price_cell(required(record, 2, "price")?)
                    .context("Error parsing 'price'")?;
                let base_price = price_cell::parse_price_cell(required(record, 3, "base_price")?)
                    .context("Error parsing 'base_price'")?;

                let mut product =
                    ProductPrice::with_base_price(name, field(record, 1), price, base_price);
                let profit = field(record, 4);
                if !profit.is_empty() {
                    product.profit = price_cell::parse_price_cell(profit)
                        .context("Error parsing 'profit'")?;
                }
                let cvv = field(record, 5);
                product.cvv = (!cvv.is_empty()).then(|| cvv.to_string());
                product.exempt = price_cell::parse_flag(field(record, 6));
                product.active = price_cell::parse_flag(field(record, 7));
                Ok(product)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// `None` when the file held no row that fixes a layout.
    pub layout: Option<CsvLayout>,
    pub products: Vec<ProductPrice>,
    pub skipped: usize,
}

pub struct ProductCsvParser {
    delimiter: u8,
}

impl ProductCsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn load_products_from_csv(&self, file_path: &str) -> Result<ImportReport> {
        let file = File::open(file_path)
            .map_err(|e| anyhow!("Failed to open CSV file '{}': {}", file_path, e))?;
        self.load_products_from_reader(BufReader::new(file))
    }

    pub fn load_products_from_reader<R: Read>(&self, reader: R) -> Result<ImportReport> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false) // header presence is detected from the first row
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut layout: Option<CsvLayout> = None;
        let mut first_row = true;
        let mut products = Vec::new();
        let mut skipped = 0;

        for result in rdr.records() {
            let record = result.map_err(|e| anyhow!("Error reading CSV record: {}", e))?;
            let line = record.position().map_or(0, |p| p.line());

            if record.iter().all(str::is_empty) {
                continue;
            }

            if first_row {
                first_row = false;
                if is_header(&record) {
                    layout = CsvLayout::from_width(record.len());
                    tracing::info!(line, columns = record.len(), ?layout, "Detected header row");
                    continue;
                }
                let detected = CsvLayout::from_width(record.len()).ok_or_else(|| {
                    ImportError::CsvDataFormatError(format!(
                        "expected 4, 6 or 8 columns, got {} at line {}",
                        record.len(),
                        line
                    ))
                })?;
                tracing::info!(line, layout = ?detected, "Detected layout from first data row");
                layout = Some(detected);
            }

            let current = match layout.or_else(|| CsvLayout::from_width(record.len())) {
                Some(current) => current,
                None => {
                    tracing::warn!(line, columns = record.len(), "Skipping row with unknown layout");
                    skipped += 1;
                    continue;
                }
            };
            layout = Some(current);

            if record.len() != current.width() {
                tracing::warn!(
                    line,
                    expected = current.width(),
                    columns = record.len(),
                    "Skipping row with wrong column count"
                );
                skipped += 1;
                continue;
            }

            match current.parse_product(&record) {
                Ok(product) => products.push(product),
                Err(e) => {
                    tracing::warn!(line, error = %format!("{:#}", e), "Skipping invalid product row");
                    skipped += 1;
                }
            }
        }

        Ok(ImportReport {
            layout,
            products,
            skipped,
        })
    }
}

fn is_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|cell| matches!(cell.to_lowercase().as_str(), "id" | "nombre" | "name"))
        .unwrap_or(false)
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn required<'a>(record: &'a StringRecord, index: usize, name: &str) -> Result<&'a str> {
    match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(anyhow!("Missing '{}' field", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    fn parse(content: &str) -> Result<ImportReport> {
        ProductCsvParser::new(b',').load_products_from_reader(content.as_bytes())
    }

    #[test]
    fn test_load_basic_layout_with_header() {
        let report = parse(
            "\
id,nombre,descripcion,precio
1,Arroz,Libra,\"2.500,50\"
2,Panela,Bloque,3200",
        )
        .unwrap();

        assert_eq!(report.layout, Some(CsvLayout::Basic));
        assert_eq!(report.skipped, 0);
        assert_eq!(report.products.len(), 2);
        assert_eq!(report.products[0].name, "Arroz");
        assert_eq!(report.products[0].price, 2500.5);
        assert_eq!(report.products[0].base_price, 2500.5);
        assert_eq!(report.products[0].profit, 0.0);
        assert_eq!(report.products[1].price, 3200.0);
        assert!(report.products[1].active);
    }

    #[test]
    fn test_load_with_base_layout_without_header() {
        let report = parse("7,Queso,Lácteos SA,Campesino,\"12.000,00\",\"9.500,00\"").unwrap();

        assert_eq!(report.layout, Some(CsvLayout::WithBase));
        let product = &report.products[0];
        assert_eq!(product.description, "Campesino");
        assert_eq!(product.price, 12000.0);
        assert_eq!(product.base_price, 9500.0);
        assert_eq!(product.profit, 2500.0);
    }

    #[test]
    fn test_load_full_layout() {
        let report = parse(
            "\
nombre,descripcion,precio,precio_base,ganancia,cvv,exento,activo
Leche,Bolsa,4200,3500,,A12,si,true
Huevos,Docena,\"9.800,00\",\"8.000,00\",\"1.500,00\",,no,0",
        )
        .unwrap();

        assert_eq!(report.layout, Some(CsvLayout::Full));
        let leche = &report.products[0];
        assert_eq!(leche.profit, 700.0);
        assert_eq!(leche.cvv.as_deref(), Some("A12"));
        assert!(leche.exempt);
        assert!(leche.active);

        let huevos = &report.products[1];
        assert_eq!(huevos.profit, 1500.0);
        assert_eq!(huevos.cvv, None);
        assert!(!huevos.exempt);
        assert!(!huevos.active);
    }

    #[test]
    fn test_rows_with_problems_are_skipped() {
        let report = parse(
            "\
id,nombre,descripcion,precio
1,Arroz,Libra,2500
2,,Sin nombre,1000
3,Sal,Kilo,
4,Azúcar,Kilo,abc
5,Aceite,Litro,9000,extra,cols
6,Café,Libra,\"32.500,00\"",
        )
        .unwrap();

        assert_eq!(report.skipped, 4);
        let names: Vec<_> = report.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Arroz", "Café"]);
    }

    #[test]
    fn test_blank_rows_are_ignored() {
        let report = parse("id,nombre,descripcion,precio\n\n1,Arroz,Libra,2500\n,,,\n").unwrap();
        assert_eq!(report.products.len(), 1);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_header_with_unknown_width_defers_layout() {
        let report = parse("id,nombre,precio\n1,Arroz,Libra,2500").unwrap();
        assert_eq!(report.layout, Some(CsvLayout::Basic));
        assert_eq!(report.products.len(), 1);
    }

    #[test]
    fn test_unknown_first_data_row_is_an_error() {
        let err = parse("Arroz,2500,Libra").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::CsvDataFormatError(_))
        ));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let report = ProductCsvParser::new(b';')
            .load_products_from_reader("1;Arroz;Libra;2.500,50".as_bytes())
            .unwrap();
        assert_eq!(report.products[0].price, 2500.5);
    }

    #[test]
    fn test_load_products_from_csv_file() {
        let tmp_file = create_test_csv("id,nombre,descripcion,precio\n1,Arroz,Libra,2500");
        let report = ProductCsvParser::new(b',')
            .load_products_from_csv(tmp_file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(report.products.len(), 1);
    }

    #[test]
    fn test_load_products_from_missing_file() {
        let result = ProductCsvParser::new(b',').load_products_from_csv("/nonexistent/products.csv");
        assert!(result.unwrap_err().to_string().contains("Failed to open CSV file"));
    }

    #[test]
    fn test_with_base_row_missing_base_price_is_skipped() {
        let report = parse("1,Queso,Sup,Desc,12000,\n2,Sal,Sup,Kilo,1200,1000").unwrap();
        assert_eq!(report.layout, Some(CsvLayout::WithBase));
        assert_eq!(report.skipped, 1);
        assert_eq!(report.products.len(), 1);
        assert_eq!(report.products[0].name, "Sal");
    }

    #[test]
    fn test_full_row_missing_base_price_is_skipped() {
        let report = parse("Leche,Bolsa,4200,,,,no,si").unwrap();
        assert_eq!(report.layout, Some(CsvLayout::Full));
        assert_eq!(report.skipped, 1);
        assert!(report.products.is_empty());
    }

    #[test]
    fn test_odd_width_row_after_undecided_header_is_skipped() {
        let report = parse("id,nombre,precio\n1,Arroz,2500\n1,Arroz,Libra,2500").unwrap();
        assert_eq!(report.layout, Some(CsvLayout::Basic));
        assert_eq!(report.skipped, 1);
        assert_eq!(report.products.len(), 1);
    }

    #[test]
    fn test_header_only_file() {
        let report = parse("id,nombre,descripcion,precio").unwrap();
        assert_eq!(report.layout, Some(CsvLayout::Basic));
        assert!(report.products.is_empty());
    }
}
