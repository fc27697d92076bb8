//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Model selection input did not name a known backend.
    #[error("Invalid backend: {0}")]
    InvalidBackend(String),
}
