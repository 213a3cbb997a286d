//! Error types for the engine.

use thiserror::Error;

use crate::optimize::SolveStatus;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Precondition failure, detected before any solve is attempted.
    #[error("nothing to optimize: no {what} given")]
    EmptyInput { what: &'static str },

    /// The solver finished without an optimal solution.
    #[error("optimization did not reach an optimal solution ({status})")]
    SolverInfeasible { status: SolveStatus },

    /// The model handed to the solver was malformed.
    #[error("solver error: {0}")]
    SolverError(String),

    /// The caller's store rejected a computed assignment.
    #[error("failed to persist assignment: {0}")]
    Persist(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    pub fn empty(what: &'static str) -> Self {
        EngineError::EmptyInput { what }
    }

    /// Whether resubmitting the same input could succeed.
    ///
    /// Solver outcomes are deterministic for a given input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Persist(_))
    }

    /// True for the "no agents / stops / categories" precondition failures.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, EngineError::EmptyInput { .. })
    }
}
