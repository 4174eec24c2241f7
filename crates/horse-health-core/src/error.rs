//! Error taxonomy for record keeping operations.
//!
//! Every variant is recoverable: callers report it to the user and carry on.

use thiserror::Error;

use crate::models::ValidationError;
use crate::store::StoreError;

/// Import data that cannot replace the collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid file format: expected a JSON array of horses")]
    InvalidFormat,

    #[error("Could not read import data: {0}")]
    Malformed(String),

    #[error("Horse {0} has no name")]
    UnnamedHorse(usize),
}

/// Errors surfaced by the repository and session.
#[derive(Error, Debug)]
pub enum HealthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Import(#[from] ImportError),

    /// The write failed; in-memory state still holds the change.
    #[error("Could not save data: {0}")]
    Persistence(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type HealthResult<T> = Result<T, HealthError>;
