//! Error types for engine operations.

use thiserror::Error;

/// Errors produced by engine components.
///
/// `NotFound` and `Conflict` are rejected operations with no partial effect:
/// the transition simply does not apply. Backend failures carry context from
/// the store or notification adapter.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A referenced job, installer, or confirmation request is absent.
    #[error("not found: {0}")]
    NotFound(String),
    /// A state transition is invalid for the current status, or lost a race
    /// against a concurrent transition.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
}

impl EngineError {
    /// True for rejected-operation errors (`NotFound`/`Conflict`), which
    /// leave no partial effect behind.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Conflict(_))
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
