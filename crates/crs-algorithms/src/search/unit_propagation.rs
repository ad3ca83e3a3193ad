//! Boolean constraint propagation over the three constraint kinds the Code
//! Reasoning State tracks: a node is either selected, deselected, or
//! unassigned, and each constraint either forces an unassigned node's value
//! or, if the current partial assignment already violates it, reports a
//! conflict.
//!
//! Because constraint violations are deterministic checks rather than
//! heuristic judgments, a conflict always emits a `Hard` `ProofDelta` marking
//! the offending nodes `Disproven`.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::types::{Constraint, ConstraintKind};
use crs_store::{Delta, DeltaKind, ProofDelta, ProofUpdate, Snapshot};
use crs_types::{now_ms, ConstraintId, NodeId, ProofStatus, SignalSource};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct UnitPropagationInput {
    pub constraints: Vec<Constraint>,
    pub assignment: HashMap<NodeId, bool>,
}

/// An unassigned node whose value the constraint set forces.
#[derive(Debug, Clone)]
pub struct ForcedMove {
    pub node: NodeId,
    pub selected: bool,
    pub reason: String,
}

/// A constraint the current assignment already violates.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub constraint_id: ConstraintId,
    pub nodes: Vec<NodeId>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UnitPropagationOutput {
    pub assignment: HashMap<NodeId, bool>,
    pub forced_moves: Vec<ForcedMove>,
    pub conflicts: Vec<Conflict>,
    pub conflict_detected: bool,
}

#[derive(Default)]
pub struct UnitPropagator;

impl Evaluable for UnitPropagator {
    fn name(&self) -> &'static str {
        "unit_propagation"
    }
    fn input_type(&self) -> &'static str {
        "UnitPropagationInput"
    }
    fn output_type(&self) -> &'static str {
        "UnitPropagationOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1)
    }
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("fixpoint", "propagation halts once no constraint can force a further move"),
            Property::new("forced_move_is_consistent", "a forced move is consistent with at least one constraint"),
        ]
    }
}

impl Algorithm for UnitPropagator {
    type Input = UnitPropagationInput;
    type Output = UnitPropagationOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<Delta>), AlgorithmError> {
        let mut assignment = input.assignment;
        let mut forced_moves = Vec::new();
        let mut conflicts = Vec::new();

        let mut changed = true;
        while changed {
            changed = false;
            if ctx.is_cancelled() {
                return Err(AlgorithmError::Cancelled("unit propagation cancelled".into()));
            }
            for constraint in &input.constraints {
                match constraint.kind {
                    ConstraintKind::MutualExclusion => {
                        propagate_mutual_exclusion(constraint, &mut assignment, &mut forced_moves, &mut conflicts, &mut changed);
                    }
                    ConstraintKind::Implication => {
                        propagate_implication(constraint, &mut assignment, &mut forced_moves, &mut conflicts, &mut changed);
                    }
                    ConstraintKind::Ordering => {
                        propagate_ordering(constraint, &mut assignment, &mut forced_moves, &mut conflicts, &mut changed);
                    }
                }
            }
        }

        let conflict_detected = !conflicts.is_empty();
        let delta = conflict_detected.then(|| disproof_delta(&conflicts));
        Ok((UnitPropagationOutput { assignment, forced_moves, conflicts, conflict_detected }, delta))
    }
}

fn propagate_mutual_exclusion(
    constraint: &Constraint,
    assignment: &mut HashMap<NodeId, bool>,
    forced_moves: &mut Vec<ForcedMove>,
    conflicts: &mut Vec<Conflict>,
    changed: &mut bool,
) {
    let selected: Vec<NodeId> = constraint.nodes.iter().copied().filter(|n| assignment.get(n) == Some(&true)).collect();
    if selected.len() >= 2 {
        conflicts.push(Conflict {
            constraint_id: constraint.id,
            nodes: selected,
            description: "mutual exclusion violated: more than one node selected".into(),
        });
        return;
    }
    if let Some(&chosen) = selected.first() {
        for &node in &constraint.nodes {
            if node != chosen && assignment.get(&node).is_none() {
                assignment.insert(node, false);
                forced_moves.push(ForcedMove {
                    node,
                    selected: false,
                    reason: "mutual exclusion: another node in the set is already selected".into(),
                });
                *changed = true;
            }
        }
    }
}

fn propagate_implication(
    constraint: &Constraint,
    assignment: &mut HashMap<NodeId, bool>,
    forced_moves: &mut Vec<ForcedMove>,
    conflicts: &mut Vec<Conflict>,
    changed: &mut bool,
) {
    let [antecedent, consequent] = constraint.nodes.as_slice() else { return };
    match (assignment.get(antecedent), assignment.get(consequent)) {
        (Some(true), Some(false)) => conflicts.push(Conflict {
            constraint_id: constraint.id,
            nodes: vec![*antecedent, *consequent],
            description: "implication violated: antecedent selected but consequent deselected".into(),
        }),
        (Some(true), None) => {
            assignment.insert(*consequent, true);
            forced_moves.push(ForcedMove {
                node: *consequent,
                selected: true,
                reason: "implication: antecedent is selected".into(),
            });
            *changed = true;
        }
        _ => {}
    }
}

fn propagate_ordering(
    constraint: &Constraint,
    assignment: &mut HashMap<NodeId, bool>,
    forced_moves: &mut Vec<ForcedMove>,
    conflicts: &mut Vec<Conflict>,
    changed: &mut bool,
) {
    for i in 1..constraint.nodes.len() {
        let node = constraint.nodes[i];
        if assignment.get(&node) != Some(&true) {
            continue;
        }
        for &earlier in &constraint.nodes[..i] {
            match assignment.get(&earlier) {
                Some(false) => conflicts.push(Conflict {
                    constraint_id: constraint.id,
                    nodes: vec![earlier, node],
                    description: "ordering violated: a later node is selected without an earlier required node".into(),
                }),
                None => {
                    assignment.insert(earlier, true);
                    forced_moves.push(ForcedMove {
                        node: earlier,
                        selected: true,
                        reason: "ordering: a later node requires this node selected first".into(),
                    });
                    *changed = true;
                }
                Some(true) => {}
            }
        }
    }
}

fn disproof_delta(conflicts: &[Conflict]) -> Delta {
    let mut seen = HashSet::new();
    let mut updates = Vec::new();
    for conflict in conflicts {
        for &node_id in &conflict.nodes {
            if seen.insert(node_id) {
                updates.push(ProofUpdate { node_id, proof: 0, disproof: 0, status: ProofStatus::Disproven });
            }
        }
    }
    Delta::new(SignalSource::Hard, DeltaKind::Proof(ProofDelta { updates }), now_ms())
}
