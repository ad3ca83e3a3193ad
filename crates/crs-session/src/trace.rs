//! The reasoning trace: an append-only log of what a session did, kept
//! alongside the session rather than in the CRS itself so a caller can poll
//! `GET /agent/{id}/reasoning` without taking a store snapshot.

use crate::state_machine::SessionPhase;
use crs_types::{now_ms, TimestampMs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub phase: SessionPhase,
    pub description: String,
    pub recorded_at: TimestampMs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasoningTrace {
    steps: Vec<ReasoningStep>,
}

impl ReasoningTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, phase: SessionPhase, description: impl Into<String>) {
        self.steps.push(ReasoningStep { phase, description: description.into(), recorded_at: now_ms() });
    }

    #[must_use]
    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_steps_in_order() {
        let mut trace = ReasoningTrace::new();
        trace.record(SessionPhase::Plan, "decomposed the goal");
        trace.record(SessionPhase::Explore, "queried the dependency graph");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[0].description, "decomposed the goal");
    }
}
