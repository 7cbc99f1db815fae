use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported value type: {0}")]
    UnsupportedValue(String),

    #[error("Invalid number: cannot represent {0} as JSON number")]
    InvalidNumber(String),
}
