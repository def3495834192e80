//! Parse and validation errors for the shared types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account id: {0}")]
    InvalidAccount(String),

    #[error("invalid token metadata: {0}")]
    InvalidMetadata(String),

    #[error("invalid token amount '{input}': {reason}")]
    InvalidUnits { input: String, reason: String },
}
