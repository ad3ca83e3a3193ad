//! Proof-number search guided by Monte-Carlo rollouts over an AND/OR game
//! tree. An OR-node's proof number is the sum of its children's; its
//! disproof number is their minimum (and mirrored for AND-nodes).
//!
//! This algorithm never asserts a terminal verdict itself — it always
//! reports `ProofStatus::Expanded` and tags its delta `SignalSource::Soft`,
//! so the store's soft-signal-cannot-write-terminal invariant is upheld by
//! construction rather than by a runtime check here.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::{Delta, DeltaKind, ProofDelta, ProofUpdate, Snapshot};
use crs_types::{now_ms, NodeId, ProofStatus, SignalSource};
use rand::seq::SliceRandom;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct GameNode {
    pub id: NodeId,
    pub children: Vec<NodeId>,
    pub is_or_node: bool,
}

#[derive(Debug, Clone)]
pub struct PnMctsInput {
    pub root: NodeId,
    pub nodes: HashMap<NodeId, GameNode>,
    pub rollouts: usize,
}

#[derive(Debug, Clone)]
pub struct PnMctsOutput {
    pub proof_numbers: HashMap<NodeId, (u64, u64)>,
    pub most_proving: Option<NodeId>,
}

#[derive(Default)]
pub struct PnMcts;

impl Evaluable for PnMcts {
    fn name(&self) -> &'static str {
        "pn_mcts"
    }
    fn input_type(&self) -> &'static str {
        "PnMctsInput"
    }
    fn output_type(&self) -> &'static str {
        "PnMctsOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(3)
    }
    fn supports_partial_results(&self) -> bool {
        true
    }
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("or_node_proof_is_sum", "an OR-node's proof number equals the sum of its children's proof numbers"),
            Property::new("or_node_disproof_is_min", "an OR-node's disproof number equals the minimum of its children's disproof numbers"),
            Property::new("no_terminal_from_soft", "this algorithm never emits a proof update carrying Proven or Disproven status"),
        ]
    }
}

impl Algorithm for PnMcts {
    type Input = PnMctsInput;
    type Output = PnMctsOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<Delta>), AlgorithmError> {
        let mut numbers: HashMap<NodeId, (u64, u64)> = input.nodes.keys().map(|&id| (id, (1, 1))).collect();
        for _ in 0..input.rollouts.max(1) {
            if ctx.is_cancelled() {
                break;
            }
            let Some(leaf) = select_most_proving(&input, &numbers) else {
                return Err(AlgorithmError::InvalidInput { expected: "a reachable leaf", actual: "disconnected game tree" });
            };
            backpropagate(&input, &mut numbers, leaf);
        }
        let most_proving = select_most_proving(&input, &numbers);
        let updates: Vec<ProofUpdate> = numbers
            .iter()
            .map(|(&node_id, &(proof, disproof))| ProofUpdate { node_id, proof, disproof, status: ProofStatus::Expanded })
            .collect();
        let delta = Delta::new(SignalSource::Soft, DeltaKind::Proof(ProofDelta { updates }), now_ms());
        Ok((PnMctsOutput { proof_numbers: numbers, most_proving }, Some(delta)))
    }
}

/// Walk from the root toward the leaf with the lowest proof number,
/// breaking ties at random rather than by iteration order, the way a
/// Monte-Carlo rollout samples among equally-promising children.
fn select_most_proving(input: &PnMctsInput, numbers: &HashMap<NodeId, (u64, u64)>) -> Option<NodeId> {
    let mut rng = rand::thread_rng();
    let mut current = input.root;
    loop {
        let node = input.nodes.get(&current)?;
        if node.children.is_empty() {
            return Some(current);
        }
        let min_proof = node.children.iter().map(|c| numbers.get(c).map_or(1, |&(p, _)| p)).min()?;
        let tied: Vec<NodeId> =
            node.children.iter().copied().filter(|c| numbers.get(c).map_or(1, |&(p, _)| p) == min_proof).collect();
        current = *tied.choose(&mut rng)?;
    }
}

fn backpropagate(input: &PnMctsInput, numbers: &mut HashMap<NodeId, (u64, u64)>, leaf: NodeId) {
    numbers.entry(leaf).and_modify(|(p, d)| {
        *p += 1;
        *d += 1;
    });
    let mut parents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for (id, node) in &input.nodes {
        for child in &node.children {
            parents.entry(*child).or_default().push(*id);
        }
    }
    let mut frontier = vec![leaf];
    while let Some(node_id) = frontier.pop() {
        let Some(ps) = parents.get(&node_id) else { continue };
        for &parent_id in ps {
            let Some(parent) = input.nodes.get(&parent_id) else { continue };
            let (proof, disproof) = if parent.is_or_node {
                let proof: u64 = parent.children.iter().filter_map(|c| numbers.get(c).map(|v| v.0)).sum();
                let disproof = parent.children.iter().filter_map(|c| numbers.get(c).map(|v| v.1)).min().unwrap_or(1);
                (proof.max(1), disproof.max(1))
            } else {
                let disproof: u64 = parent.children.iter().filter_map(|c| numbers.get(c).map(|v| v.1)).sum();
                let proof = parent.children.iter().filter_map(|c| numbers.get(c).map(|v| v.0)).min().unwrap_or(1);
                (proof.max(1), disproof.max(1))
            };
            numbers.insert(parent_id, (proof, disproof));
            frontier.push(parent_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: NodeId) -> GameNode {
        GameNode { id, children: vec![], is_or_node: true }
    }

    #[test]
    fn or_node_proof_equals_sum_of_children() {
        let root = NodeId::new();
        let child_a = NodeId::new();
        let child_b = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, GameNode { id: root, children: vec![child_a, child_b], is_or_node: true });
        nodes.insert(child_a, leaf(child_a));
        nodes.insert(child_b, leaf(child_b));
        let algo = PnMcts;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, delta) = algo.process(&ctx, &snapshot, PnMctsInput { root, nodes, rollouts: 4 }).unwrap();
        let (root_proof, _) = output.proof_numbers[&root];
        let (a_proof, _) = output.proof_numbers[&child_a];
        let (b_proof, _) = output.proof_numbers[&child_b];
        assert_eq!(root_proof, a_proof + b_proof);
        assert!(delta.is_some());
    }

    #[test]
    fn never_emits_a_terminal_status() {
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, leaf(root));
        let algo = PnMcts;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (_, delta) = algo.process(&ctx, &snapshot, PnMctsInput { root, nodes, rollouts: 2 }).unwrap();
        let Some(delta) = delta else { panic!("expected a delta") };
        assert!(delta.terminal_writes().is_empty());
    }
}
