//! Session phase state machine (Idle -> Plan -> Explore -> Reason ->
//! (Clarify) -> Respond -> Complete), with Aborted and Error reachable from
//! any non-terminal phase.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Plan,
    Explore,
    Reason,
    Clarify,
    Respond,
    Complete,
    Aborted,
    Error,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl SessionPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Complete | SessionPhase::Aborted | SessionPhase::Error)
    }

    /// The phases reachable from `self` in one step, excluding the
    /// always-available Aborted/Error escape hatches.
    fn forward_targets(self) -> &'static [SessionPhase] {
        use SessionPhase::{Clarify, Explore, Idle, Plan, Reason, Respond};
        match self {
            Idle => &[Plan],
            Plan => &[Explore],
            Explore => &[Reason],
            Reason => &[Clarify, Respond],
            Clarify => &[Explore],
            Respond => &[SessionPhase::Complete],
            SessionPhase::Complete | SessionPhase::Aborted | SessionPhase::Error => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    current: SessionPhase,
}

impl StateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self { current: SessionPhase::Idle }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.current
    }

    /// Advance to `to`. Any non-terminal phase may escape to `Aborted` or
    /// `Error`; otherwise the transition must be one of `SessionPhase`'s
    /// declared forward edges.
    pub fn transition(&mut self, to: SessionPhase) -> Result<(), SessionError> {
        if self.current.is_terminal() {
            return Err(SessionError::AlreadyTerminal(self.current));
        }
        let allowed = matches!(to, SessionPhase::Aborted | SessionPhase::Error) || self.current.forward_targets().contains(&to);
        if !allowed {
            return Err(SessionError::InvalidTransition { from: self.current, to });
        }
        self.current = to;
        Ok(())
    }

    /// Force a move to `to` regardless of the declared forward edges, used
    /// when a budget runs out mid-reasoning and the session must give up
    /// whatever phase it is in and respond. Still refuses to leave a
    /// terminal phase.
    pub fn force(&mut self, to: SessionPhase) -> Result<(), SessionError> {
        if self.current.is_terminal() {
            return Err(SessionError::AlreadyTerminal(self.current));
        }
        self.current = to;
        Ok(())
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_the_happy_path_to_completion() {
        let mut sm = StateMachine::new();
        sm.transition(SessionPhase::Plan).unwrap();
        sm.transition(SessionPhase::Explore).unwrap();
        sm.transition(SessionPhase::Reason).unwrap();
        sm.transition(SessionPhase::Respond).unwrap();
        sm.transition(SessionPhase::Complete).unwrap();
        assert!(sm.phase().is_terminal());
    }

    #[test]
    fn reason_may_loop_through_clarify_back_to_explore() {
        let mut sm = StateMachine::new();
        sm.transition(SessionPhase::Plan).unwrap();
        sm.transition(SessionPhase::Explore).unwrap();
        sm.transition(SessionPhase::Reason).unwrap();
        sm.transition(SessionPhase::Clarify).unwrap();
        sm.transition(SessionPhase::Explore).unwrap();
        assert_eq!(sm.phase(), SessionPhase::Explore);
    }

    #[test]
    fn rejects_skipping_a_phase() {
        let mut sm = StateMachine::new();
        assert!(sm.transition(SessionPhase::Reason).is_err());
    }

    #[test]
    fn any_non_terminal_phase_can_abort() {
        let mut sm = StateMachine::new();
        sm.transition(SessionPhase::Plan).unwrap();
        sm.transition(SessionPhase::Aborted).unwrap();
        assert!(sm.phase().is_terminal());
    }

    #[test]
    fn terminal_phases_reject_further_transitions() {
        let mut sm = StateMachine::new();
        sm.transition(SessionPhase::Aborted).unwrap();
        assert!(sm.transition(SessionPhase::Plan).is_err());
    }

    #[test]
    fn force_skips_straight_to_respond_from_any_non_terminal_phase() {
        let mut sm = StateMachine::new();
        sm.transition(SessionPhase::Plan).unwrap();
        sm.force(SessionPhase::Respond).unwrap();
        assert_eq!(sm.phase(), SessionPhase::Respond);
    }

    #[test]
    fn force_still_refuses_to_leave_a_terminal_phase() {
        let mut sm = StateMachine::new();
        sm.transition(SessionPhase::Aborted).unwrap();
        assert!(sm.force(SessionPhase::Respond).is_err());
    }
}
