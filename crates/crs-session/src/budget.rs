//! Session resource budgets: step count, token count and wall-clock time.
//! Exhausting any one of them forces the session toward `Respond` with
//! whatever partial result it has, rather than continuing to reason.

use crate::error::SessionError;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Budget {
    pub max_steps: u32,
    pub max_tokens: u64,
    pub max_wall_clock: Duration,
}

impl Default for Budget {
    fn default() -> Self {
        Self { max_steps: 64, max_tokens: 200_000, max_wall_clock: Duration::from_secs(120) }
    }
}

#[derive(Debug, Clone)]
pub struct BudgetUsage {
    budget: Budget,
    steps_used: u32,
    tokens_used: u64,
    started_at: Instant,
}

impl BudgetUsage {
    #[must_use]
    pub fn new(budget: Budget) -> Self {
        Self { budget, steps_used: 0, tokens_used: 0, started_at: Instant::now() }
    }

    pub fn consume_step(&mut self) -> Result<(), SessionError> {
        if self.steps_used >= self.budget.max_steps {
            return Err(SessionError::BudgetExhausted("max_steps"));
        }
        self.steps_used += 1;
        self.check_wall_clock()
    }

    pub fn consume_tokens(&mut self, tokens: u64) -> Result<(), SessionError> {
        self.tokens_used = self.tokens_used.saturating_add(tokens);
        if self.tokens_used > self.budget.max_tokens {
            return Err(SessionError::BudgetExhausted("max_tokens"));
        }
        self.check_wall_clock()
    }

    fn check_wall_clock(&self) -> Result<(), SessionError> {
        if self.started_at.elapsed() > self.budget.max_wall_clock {
            return Err(SessionError::BudgetExhausted("max_wall_clock"));
        }
        Ok(())
    }

    #[must_use]
    pub fn steps_used(&self) -> u32 {
        self.steps_used
    }

    #[must_use]
    pub fn tokens_used(&self) -> u64 {
        self.tokens_used
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.steps_used >= self.budget.max_steps
            || self.tokens_used >= self.budget.max_tokens
            || self.started_at.elapsed() >= self.budget.max_wall_clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_budget_is_enforced() {
        let mut usage = BudgetUsage::new(Budget { max_steps: 1, ..Budget::default() });
        usage.consume_step().unwrap();
        assert!(usage.consume_step().is_err());
    }

    #[test]
    fn token_budget_is_enforced() {
        let mut usage = BudgetUsage::new(Budget { max_tokens: 10, ..Budget::default() });
        assert!(usage.consume_tokens(11).is_err());
    }

    #[test]
    fn fresh_budget_is_not_exhausted() {
        let usage = BudgetUsage::new(Budget::default());
        assert!(!usage.is_exhausted());
    }
}
