//! Domain error model.

use thiserror::Error;

/// Result type used across the simulation and query layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic simulation/query failures. File and
/// serialization problems belong to the outer crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Generation parameters were malformed (non-positive counts, empty pools).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No catalog listing had stock left when an order was drawn.
    #[error("inventory exhausted after {generated} of {requested} orders")]
    InventoryExhausted { generated: usize, requested: usize },

    /// An operation was attempted in the wrong lifecycle phase.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A lookup (item title, customer id) matched nothing.
    #[error("not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn exhausted(generated: usize, requested: usize) -> Self {
        Self::InventoryExhausted {
            generated,
            requested,
        }
    }

    /// Whether a caller can reasonably recover (e.g. show "not found" and move on).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
