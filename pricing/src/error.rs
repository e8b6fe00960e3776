use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("Price value is empty")]
    Empty,

    #[error("Invalid Colombian price '{0}'")]
    Invalid(String),
}
