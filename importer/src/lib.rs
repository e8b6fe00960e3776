// Importer library root: product price CSV loading and export built on `pricing`

pub mod config;
pub mod data;
pub mod error;
pub mod services;
