//! Two-watched-literal unit propagation: each clause of length >= 2 tracks
//! two literals that are not yet falsified, only rescanning the clause when
//! one of them becomes falsified. Supports partial results because
//! propagation can be cancelled mid-pass and still returns everything
//! assigned so far.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::Snapshot;
use std::collections::HashMap;

pub type Literal = i64;

#[derive(Debug, Clone)]
pub struct WatchedClause {
    pub literals: Vec<Literal>,
    pub watch: [usize; 2],
}

impl WatchedClause {
    #[must_use]
    pub fn new(literals: Vec<Literal>) -> Self {
        let watch = if literals.len() >= 2 { [0, 1] } else { [0, 0] };
        Self { literals, watch }
    }
}

#[derive(Debug, Clone)]
pub struct WatchedLiteralsInput {
    pub clauses: Vec<Vec<Literal>>,
    pub assignment: HashMap<i64, bool>,
}

#[derive(Debug, Clone)]
pub struct WatchedLiteralsOutput {
    pub newly_assigned: HashMap<i64, bool>,
    pub conflict: bool,
}

#[derive(Default)]
pub struct WatchedLiteralPropagator;

impl Evaluable for WatchedLiteralPropagator {
    fn name(&self) -> &'static str {
        "watched_literals"
    }
    fn input_type(&self) -> &'static str {
        "WatchedLiteralsInput"
    }
    fn output_type(&self) -> &'static str {
        "WatchedLiteralsOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1)
    }
    fn supports_partial_results(&self) -> bool {
        true
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new(
            "watch_invariant",
            "every clause of length >= 2 watches two literals that are not both falsified, or the solver reports conflict",
        )]
    }
}

impl Algorithm for WatchedLiteralPropagator {
    type Input = WatchedLiteralsInput;
    type Output = WatchedLiteralsOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<crs_store::Delta>), AlgorithmError> {
        let mut assignment = input.assignment.clone();
        let mut clauses: Vec<WatchedClause> = input.clauses.into_iter().map(WatchedClause::new).collect();
        let mut newly_assigned = HashMap::new();
        let mut changed = true;
        while changed {
            changed = false;
            if ctx.is_cancelled() {
                return Ok((WatchedLiteralsOutput { newly_assigned, conflict: false }, None));
            }
            for clause in &mut clauses {
                match propagate_clause(clause, &mut assignment, &mut newly_assigned) {
                    Some(true) => return Ok((WatchedLiteralsOutput { newly_assigned, conflict: true }, None)),
                    Some(false) => changed = true,
                    None => {}
                }
            }
        }
        Ok((WatchedLiteralsOutput { newly_assigned, conflict: false }, None))
    }
}

/// `Some(true)` on conflict, `Some(false)` if an assignment was made, `None` if nothing changed.
fn propagate_clause(
    clause: &mut WatchedClause,
    assignment: &mut HashMap<i64, bool>,
    newly_assigned: &mut HashMap<i64, bool>,
) -> Option<bool> {
    if clause.literals.is_empty() {
        return None;
    }
    let lit_value = |lit: Literal, assignment: &HashMap<i64, bool>| assignment.get(&lit.abs()).map(|&v| v == (lit > 0));

    let [w0, w1] = clause.watch;
    let l0 = clause.literals[w0];
    let l1 = clause.literals.get(w1).copied().unwrap_or(l0);
    let v0 = lit_value(l0, assignment);
    let v1 = lit_value(l1, assignment);
    if v0 == Some(true) || v1 == Some(true) {
        return None;
    }
    if v0 == Some(false) && v1 == Some(false) {
        for (idx, &lit) in clause.literals.iter().enumerate() {
            if idx == w0 || idx == w1 {
                continue;
            }
            if lit_value(lit, assignment) != Some(false) {
                clause.watch[0] = idx;
                return None;
            }
        }
        return Some(true);
    }
    if v0.is_none() && v1 == Some(false) {
        assignment.insert(l0.abs(), l0 > 0);
        newly_assigned.insert(l0.abs(), l0 > 0);
        return Some(false);
    }
    if v1.is_none() && v0 == Some(false) {
        assignment.insert(l1.abs(), l1 > 0);
        newly_assigned.insert(l1.abs(), l1 > 0);
        return Some(false);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propagates_a_forced_unit_literal() {
        let propagator = WatchedLiteralPropagator;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let mut assignment = HashMap::new();
        assignment.insert(1, false);
        let input = WatchedLiteralsInput { clauses: vec![vec![1, 2]], assignment };
        let (output, _) = propagator.process(&ctx, &snapshot, input).unwrap();
        assert_eq!(output.newly_assigned.get(&2), Some(&true));
        assert!(!output.conflict);
    }

    #[test]
    fn detects_conflict_when_both_watches_are_falsified() {
        let propagator = WatchedLiteralPropagator;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let mut assignment = HashMap::new();
        assignment.insert(1, false);
        assignment.insert(2, false);
        let input = WatchedLiteralsInput { clauses: vec![vec![1, 2]], assignment };
        let (output, _) = propagator.process(&ctx, &snapshot, input).unwrap();
        assert!(output.conflict);
    }
}
