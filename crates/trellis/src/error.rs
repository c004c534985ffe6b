//! Error types for Trellis operations.
//!
//! This module provides the main error type [`TrellisError`]. Every fatal
//! error aborts the pending mutation as a whole: the topic is left exactly as
//! it was before the call.

use std::io;

use thiserror::Error;

use trellis_core::schema::EdgeRejection;

/// The main error type for Trellis operations.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// A referenced node, edge or diagram does not exist where it was expected.
    ///
    /// Usually means the caller acted on stale state.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A proposed connection violates the schema, duplicates an edge,
    /// self-loops or would introduce a cycle.
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] EdgeRejection),

    /// An operation's entity-kind precondition does not hold.
    ///
    /// Signals a logic defect in the caller rather than a user-correctable
    /// condition.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A write was attempted on a session opened read-only.
    #[error("Topic is read-only: {0}")]
    ReadOnly(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrellisError {
    /// Create a [`TrellisError::NotFound`] for a described entity.
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Create a [`TrellisError::ReadOnly`] naming the refused action.
    pub fn read_only(action: impl Into<String>) -> Self {
        Self::ReadOnly(action.into())
    }

    /// Create a [`TrellisError::InvariantViolation`] with a message.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }
}
