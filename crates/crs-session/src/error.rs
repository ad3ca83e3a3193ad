//! Error taxonomy for the session state machine, budget enforcement and
//! tool routing.

use crate::state_machine::SessionPhase;
use crs_types::SessionId;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("cannot transition session from {from:?} to {to:?}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },

    #[error("session {0} is already in a terminal phase")]
    AlreadyTerminal(SessionPhase),

    #[error("budget exhausted: {0}")]
    BudgetExhausted(&'static str),

    #[error("tool '{tool}' confidence {confidence:.3} is below its dispatch threshold")]
    ToolConfidenceBelowThreshold { tool: &'static str, confidence: f64 },

    #[error("no fallback tool configured for a below-threshold dispatch")]
    NoFallbackTool,

    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error("clarification requested but the session carries no pending question")]
    NoPendingClarification,
}

impl SessionError {
    /// `true` if retrying the same operation after caller-side correction
    /// (e.g. picking a different tool, waiting for clarification) could
    /// succeed, as opposed to a budget or not-found error that cannot.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::ToolConfidenceBelowThreshold { .. }
                | SessionError::NoFallbackTool
                | SessionError::NoPendingClarification
        )
    }
}
