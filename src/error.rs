use thiserror::Error;

#[derive(Error, Debug)]
pub enum DreError {
    #[error("Invalid configuration for '{field}': {details}")]
    ValidationError { field: String, details: String },

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Failed to fetch records: {0}")]
    FetchError(String),

    #[error("Invalid amount '{0}': expected a number")]
    InvalidAmount(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DreError>;
