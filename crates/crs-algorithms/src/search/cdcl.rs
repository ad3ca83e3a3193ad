//! Conflict-driven clause learning: given a conflict and the assignments
//! that produced it, learn a clause only when the conflict's signal source
//! is deterministic.
//!
//! A learned clause is the negation of the conflicting literals — a
//! conservative, deterministic resolution step — so a Hard conflict always
//! produces the same clause from the same inputs. A Soft conflict (one
//! arising from a heuristic judgment rather than a deterministic check)
//! never gets to learn anything: the store's soft-signal-cannot-write-
//! terminal invariant has an analogue here at the algorithm boundary, since
//! a learned clause records a fact the solver will treat as certain from
//! then on.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::Snapshot;
use crs_types::SignalSource;

pub type Literal = i64;

#[derive(Debug, Clone)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

/// One assignment a solver made, and the decision level it was made at.
/// Level 0 is forced/unit propagation; level *n > 0* is the *n*th choice
/// point.
#[derive(Debug, Clone, Copy)]
pub struct Assignment {
    pub var: usize,
    pub value: bool,
    pub level: u32,
}

#[derive(Debug, Clone)]
pub struct CdclInput {
    /// The falsified clause's literals, as found by propagation.
    pub conflict: Vec<Literal>,
    pub assignments: Vec<Assignment>,
    pub source: SignalSource,
}

#[derive(Debug, Clone)]
pub struct CdclOutput {
    pub learned_clause: Option<Clause>,
    pub conflict_was_soft: bool,
    pub backjump_level: u32,
}

#[derive(Default)]
pub struct CdclSolver;

impl Evaluable for CdclSolver {
    fn name(&self) -> &'static str {
        "cdcl_conflict_learning"
    }
    fn input_type(&self) -> &'static str {
        "CdclInput"
    }
    fn output_type(&self) -> &'static str {
        "CdclOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1)
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new(
            "no_learned_clause_from_soft",
            "a conflict with signal source Soft never produces a learned clause",
        )]
    }
}

impl Algorithm for CdclSolver {
    type Input = CdclInput;
    type Output = CdclOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<crs_store::Delta>), AlgorithmError> {
        if ctx.is_cancelled() {
            return Err(AlgorithmError::Cancelled("cdcl conflict analysis cancelled".into()));
        }
        if !input.source.may_write_terminal() {
            return Ok((CdclOutput { learned_clause: None, conflict_was_soft: true, backjump_level: 0 }, None));
        }
        let learned_clause = Some(negate(&input.conflict));
        let backjump_level = backjump_level(&input.conflict, &input.assignments);
        Ok((CdclOutput { learned_clause, conflict_was_soft: false, backjump_level }, None))
    }
}

/// Second-highest decision level among the assignments whose variable
/// participates in the conflict, or 0 if fewer than two such levels exist.
fn backjump_level(conflict: &[Literal], assignments: &[Assignment]) -> u32 {
    let mut levels: Vec<u32> = assignments
        .iter()
        .filter(|a| conflict.iter().any(|lit| lit.unsigned_abs() as usize == a.var))
        .map(|a| a.level)
        .collect();
    levels.sort_unstable_by(|a, b| b.cmp(a));
    levels.dedup();
    levels.get(1).copied().unwrap_or(0)
}

fn negate(conflict: &[Literal]) -> Clause {
    Clause { literals: conflict.iter().map(|l| -l).collect() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_conflict_learns_the_negated_clause_and_backjumps() {
        let solver = CdclSolver;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let input = CdclInput {
            conflict: vec![1, 2, -3],
            assignments: vec![
                Assignment { var: 1, value: true, level: 1 },
                Assignment { var: 2, value: true, level: 3 },
                Assignment { var: 3, value: true, level: 2 },
                Assignment { var: 4, value: false, level: 5 },
            ],
            source: SignalSource::Hard,
        };
        let (output, delta) = solver.process(&ctx, &snapshot, input).unwrap();
        assert!(!output.conflict_was_soft);
        let clause = output.learned_clause.expect("hard conflict must learn a clause");
        assert_eq!(clause.literals, vec![-1, -2, 3]);
        // participating levels are {1, 3, 2}; second-highest is 2
        assert_eq!(output.backjump_level, 2);
        assert!(delta.is_none());
    }

    #[test]
    fn soft_conflict_refuses_to_learn() {
        let solver = CdclSolver;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let input = CdclInput {
            conflict: vec![1, -2],
            assignments: vec![
                Assignment { var: 1, value: true, level: 1 },
                Assignment { var: 2, value: false, level: 4 },
            ],
            source: SignalSource::Soft,
        };
        let (output, _) = solver.process(&ctx, &snapshot, input).unwrap();
        assert!(output.conflict_was_soft);
        assert!(output.learned_clause.is_none());
        assert_eq!(output.backjump_level, 0);
    }

    #[test]
    fn backjump_level_is_zero_when_fewer_than_two_levels_qualify() {
        let solver = CdclSolver;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let input = CdclInput {
            conflict: vec![1],
            assignments: vec![Assignment { var: 1, value: true, level: 7 }],
            source: SignalSource::Hard,
        };
        let (output, _) = solver.process(&ctx, &snapshot, input).unwrap();
        assert_eq!(output.backjump_level, 0);
    }
}
