//! Parsing and formatting of prices written the Colombian way: `.` groups
//! thousands and `,` marks the decimals, e.g. `1.234,56`.
//!
//! The functions here are pure. Binding them to a text widget is left to the
//! caller, with [`PriceField`] holding the buffer in between edits.

pub mod colombian_format;
pub mod error;
pub mod field;
pub mod models;

pub use colombian_format::{
    format_price, format_price_on_blur, parse_price, try_parse_price, validate_price_input,
    PriceNumber,
};
pub use error::PriceError;
pub use field::PriceField;
pub use models::ProductPrice;
