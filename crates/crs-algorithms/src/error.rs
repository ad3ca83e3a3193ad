//! Error taxonomy for the algorithm runtime.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AlgorithmError {
    #[error("invalid input: expected {expected}, got {actual}")]
    InvalidInput { expected: &'static str, actual: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("operation cancelled: {0}")]
    Cancelled(String),

    #[error("timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("soft-signal violation: {0}")]
    SoftSignalViolation(String),

    #[error("{0}")]
    Internal(String),
}

impl AlgorithmError {
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AlgorithmError::Cancelled(_) | AlgorithmError::TimedOut(_))
    }
}
