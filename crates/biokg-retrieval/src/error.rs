//! Errors for the fallible edges of retrieval (configuration loading).
//!
//! Query-time degradation is never an error: it is reported through
//! [`crate::RetrievalOutcome`] and the result summary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {field} {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
