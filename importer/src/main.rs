// price-import: loads product price CSV files and prints them back with Colombian formatted prices
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use importer::config::settings::ImporterSettings;
use importer::services::ImportService;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "price-import", version, about = "Import product price CSV files")]
struct Cli {
    /// Product price CSV files, loaded in order; later files replace earlier products.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// JSON settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the normalized catalog; stdout when absent.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so the CSV on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => ImporterSettings::load_from_file(path)?,
        None => ImporterSettings::default(),
    };
    let mut service = ImportService::new(settings)?;

    for input in &cli.inputs {
        let summary = service.load_csv(input)?;
        info!(
            path = %input,
            layout = ?summary.layout,
            imported = summary.imported,
            skipped = summary.skipped,
            "Loaded file"
        );
    }

    match &cli.output {
        Some(path) => service.export_csv(BufWriter::new(File::create(path)?))?,
        None => service.export_csv(io::stdout().lock())?,
    }
    info!(products = service.catalog().len(), "Catalog exported");

    Ok(())
}
