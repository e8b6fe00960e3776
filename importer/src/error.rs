use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration file is not valid JSON: {source}")]
    ConfigParseError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    // Parsing helpers report through anyhow with line context attached.
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}
