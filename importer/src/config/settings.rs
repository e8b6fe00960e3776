// Importer settings, loaded from an optional JSON file
use serde::Deserialize;
use std::path::Path;

use crate::error::ImportError;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ImporterSettings {
    pub input_delimiter: String, // JSON string is easier to write than a byte
    pub output_delimiter: String,
    pub skip_inactive: bool,
}

impl Default for ImporterSettings {
    fn default() -> Self {
        ImporterSettings {
            input_delimiter: ",".to_string(),
            output_delimiter: ";".to_string(),
            skip_inactive: false,
        }
    }
}

impl ImporterSettings {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let settings: ImporterSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), ?settings, "Loaded importer settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        self.input_delimiter_byte()?;
        self.output_delimiter_byte()?;
        Ok(())
    }

    pub fn input_delimiter_byte(&self) -> Result<u8, ImportError> {
        delimiter_byte("input_delimiter", &self.input_delimiter)
    }

    pub fn output_delimiter_byte(&self) -> Result<u8, ImportError> {
        delimiter_byte("output_delimiter", &self.output_delimiter)
    }
}

fn delimiter_byte(name: &str, value: &str) -> Result<u8, ImportError> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ImportError::ConfigError(format!(
            "{} must be a single ASCII character, got '{}'",
            name, value
        ))),
    }
}
