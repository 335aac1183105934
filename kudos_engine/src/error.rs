//! Engine error taxonomy.
//!
//! Business conditions (a rule not holding, a role gate skipping a goal)
//! never surface as errors; these variants cover the cases where an
//! operation cannot proceed at all.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The actor may not perform the operation (inactive, or missing a
    /// required role). The whole event aborts before any mutation.
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// An id did not resolve inside the organisation's arenas.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    /// An expression string failed to parse.
    #[error(transparent)]
    Expression(#[from] kudos_expr::ExprError),
}

impl EngineError {
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden { reason: reason.into() }
    }
}
