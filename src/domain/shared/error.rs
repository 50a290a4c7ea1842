//! Domain errors

use thiserror::Error;

/// Result of a domain operation
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[cfg(test)]
    #[error("Unknown event type: {0}")]
    UnknownEvent(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
