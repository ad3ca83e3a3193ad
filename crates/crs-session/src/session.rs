//! A single reasoning session: a phase, a budget, a reasoning trace and a
//! handle to the shared Code Reasoning State store.

use crate::budget::{Budget, BudgetUsage};
use crate::error::SessionError;
use crate::state_machine::{SessionPhase, StateMachine};
use crate::trace::ReasoningTrace;
use crs_store::CrsStore;
use crs_types::SessionId;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct SessionConfig {
    pub budget: Budget,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { budget: Budget::default() }
    }
}

pub struct Session {
    id: SessionId,
    store: Arc<CrsStore>,
    phase: StateMachine,
    budget: BudgetUsage,
    trace: ReasoningTrace,
    cancellation: CancellationToken,
    pending_clarification: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(store: Arc<CrsStore>, config: SessionConfig) -> Self {
        Self {
            id: SessionId::new(),
            store,
            phase: StateMachine::new(),
            budget: BudgetUsage::new(config.budget),
            trace: ReasoningTrace::new(),
            cancellation: CancellationToken::new(),
            pending_clarification: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase.phase()
    }

    #[must_use]
    pub fn store(&self) -> &Arc<CrsStore> {
        &self.store
    }

    #[must_use]
    pub fn trace(&self) -> &ReasoningTrace {
        &self.trace
    }

    #[must_use]
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn abort(&mut self) -> Result<(), SessionError> {
        tracing::info!(session_id = %self.id, "session aborted");
        self.cancellation.cancel();
        self.phase.transition(SessionPhase::Aborted)
    }

    /// Move the session forward, charging one step against its budget. If
    /// the budget is already exhausted the session is forced to `Respond`
    /// with whatever it has rather than continuing to reason, unless it is
    /// already past `Reason`.
    pub fn advance(&mut self, to: SessionPhase, description: impl Into<String>) -> Result<(), SessionError> {
        if let Err(budget_err) = self.budget.consume_step() {
            tracing::warn!(session_id = %self.id, error = %budget_err, "budget exhausted, forcing response");
            self.trace.record(self.phase.phase(), format!("budget exhausted: {budget_err}"));
            self.phase.force(SessionPhase::Respond)?;
            return Err(budget_err);
        }
        self.phase.transition(to)?;
        self.trace.record(to, description);
        Ok(())
    }

    pub fn consume_tokens(&mut self, tokens: u64) -> Result<(), SessionError> {
        self.budget.consume_tokens(tokens)
    }

    pub fn request_clarification(&mut self, question: impl Into<String>) -> Result<(), SessionError> {
        self.advance(SessionPhase::Clarify, "requested clarification")?;
        self.pending_clarification = Some(question.into());
        Ok(())
    }

    pub fn answer_clarification(&mut self, answer: impl Into<String>) -> Result<(), SessionError> {
        if self.pending_clarification.take().is_none() {
            return Err(SessionError::NoPendingClarification);
        }
        self.advance(SessionPhase::Explore, format!("clarification answered: {}", answer.into()))
    }

    #[must_use]
    pub fn pending_clarification(&self) -> Option<&str> {
        self.pending_clarification.as_deref()
    }

    #[must_use]
    pub fn budget_exhausted(&self) -> bool {
        self.budget.is_exhausted()
    }

    #[must_use]
    pub fn steps_used(&self) -> u32 {
        self.budget.steps_used()
    }

    #[must_use]
    pub fn tokens_used(&self) -> u64 {
        self.budget.tokens_used()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> Session {
        Session::new(Arc::new(CrsStore::default()), SessionConfig::default())
    }

    #[test]
    fn advances_through_plan_and_explore() {
        let mut session = test_session();
        session.advance(SessionPhase::Plan, "planning").unwrap();
        session.advance(SessionPhase::Explore, "exploring").unwrap();
        assert_eq!(session.phase(), SessionPhase::Explore);
        assert_eq!(session.trace().len(), 2);
    }

    #[test]
    fn clarify_round_trip_resumes_explore() {
        let mut session = test_session();
        session.advance(SessionPhase::Plan, "planning").unwrap();
        session.advance(SessionPhase::Explore, "exploring").unwrap();
        session.advance(SessionPhase::Reason, "reasoning").unwrap();
        session.request_clarification("which module?").unwrap();
        assert_eq!(session.phase(), SessionPhase::Clarify);
        session.answer_clarification("the store module").unwrap();
        assert_eq!(session.phase(), SessionPhase::Explore);
    }

    #[test]
    fn exhausted_step_budget_forces_respond() {
        let mut session = Session::new(
            Arc::new(CrsStore::default()),
            SessionConfig { budget: Budget { max_steps: 1, ..Budget::default() } },
        );
        session.advance(SessionPhase::Plan, "planning").unwrap();
        let result = session.advance(SessionPhase::Explore, "exploring");
        assert!(result.is_err());
        assert_eq!(session.phase(), SessionPhase::Respond);
    }

    #[test]
    fn abort_cancels_and_moves_to_terminal_phase() {
        let mut session = test_session();
        session.abort().unwrap();
        assert!(session.phase().is_terminal());
        assert!(session.cancellation().is_cancelled());
    }
}
