//! Simplified VF2 subgraph isomorphism: depth-first extension of a partial
//! mapping, pruned by edge-consistency with everything already mapped.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::Snapshot;
use crs_types::NodeId;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct PatternGraph {
    pub nodes: Vec<NodeId>,
    pub edges: HashSet<(NodeId, NodeId)>,
}

#[derive(Debug, Clone)]
pub struct Vf2Input {
    pub pattern: PatternGraph,
    pub target: PatternGraph,
    pub max_matches: usize,
}

#[derive(Debug, Clone)]
pub struct Vf2Output {
    pub matches: Vec<HashMap<NodeId, NodeId>>,
}

#[derive(Default)]
pub struct Vf2Isomorphism;

impl Evaluable for Vf2Isomorphism {
    fn name(&self) -> &'static str {
        "vf2_isomorphism"
    }
    fn input_type(&self) -> &'static str {
        "Vf2Input"
    }
    fn output_type(&self) -> &'static str {
        "Vf2Output"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(5)
    }
    fn supports_partial_results(&self) -> bool {
        true
    }
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("injective", "each returned mapping assigns distinct target nodes to distinct pattern nodes"),
            Property::new("edge_preserving", "every pattern edge maps to an edge present in the target graph"),
        ]
    }
}

impl Algorithm for Vf2Isomorphism {
    type Input = Vf2Input;
    type Output = Vf2Output;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<crs_store::Delta>), AlgorithmError> {
        let max_matches = input.max_matches.max(1);
        let Some(&first_p) = input.pattern.nodes.first() else {
            return Ok((Vf2Output { matches: Vec::new() }, None));
        };

        // Each candidate for the first pattern node roots an independent
        // branch of the search, so the branches fan out over the worker
        // pool rather than running as one sequential DFS.
        let branches: Vec<Vec<HashMap<NodeId, NodeId>>> = input
            .target
            .nodes
            .par_iter()
            .map(|&t_node| -> Result<Vec<HashMap<NodeId, NodeId>>, AlgorithmError> {
                let mut local_matches = Vec::new();
                if !is_consistent(&input.pattern, &input.target, &HashMap::new(), first_p, t_node) {
                    return Ok(local_matches);
                }
                let mut mapping = HashMap::from([(first_p, t_node)]);
                let mut used_targets = HashSet::from([t_node]);
                search(
                    &input.pattern,
                    &input.target,
                    1,
                    &mut mapping,
                    &mut used_targets,
                    &mut local_matches,
                    max_matches,
                    ctx,
                )?;
                Ok(local_matches)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut matches: Vec<HashMap<NodeId, NodeId>> = branches.into_iter().flatten().collect();
        matches.truncate(max_matches);
        Ok((Vf2Output { matches }, None))
    }
}

#[allow(clippy::too_many_arguments)]
fn search(
    pattern: &PatternGraph,
    target: &PatternGraph,
    depth: usize,
    mapping: &mut HashMap<NodeId, NodeId>,
    used_targets: &mut HashSet<NodeId>,
    matches: &mut Vec<HashMap<NodeId, NodeId>>,
    max_matches: usize,
    ctx: &AlgorithmContext,
) -> Result<(), AlgorithmError> {
    if matches.len() >= max_matches {
        return Ok(());
    }
    if ctx.is_cancelled() {
        return Err(AlgorithmError::Cancelled("vf2 search cancelled".into()));
    }
    if depth == pattern.nodes.len() {
        matches.push(mapping.clone());
        return Ok(());
    }
    let p_node = pattern.nodes[depth];
    for &t_node in &target.nodes {
        if used_targets.contains(&t_node) {
            continue;
        }
        if is_consistent(pattern, target, mapping, p_node, t_node) {
            mapping.insert(p_node, t_node);
            used_targets.insert(t_node);
            search(pattern, target, depth + 1, mapping, used_targets, matches, max_matches, ctx)?;
            mapping.remove(&p_node);
            used_targets.remove(&t_node);
        }
    }
    Ok(())
}

fn is_consistent(
    pattern: &PatternGraph,
    target: &PatternGraph,
    mapping: &HashMap<NodeId, NodeId>,
    p_node: NodeId,
    t_node: NodeId,
) -> bool {
    for (&mapped_p, &mapped_t) in mapping {
        let pattern_has_edge = pattern.edges.contains(&(p_node, mapped_p)) || pattern.edges.contains(&(mapped_p, p_node));
        let target_has_edge = target.edges.contains(&(t_node, mapped_t)) || target.edges.contains(&(mapped_t, t_node));
        if pattern_has_edge != target_has_edge {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_an_injective_edge_preserving_mapping() {
        let p1 = NodeId::new();
        let p2 = NodeId::new();
        let t1 = NodeId::new();
        let t2 = NodeId::new();
        let t3 = NodeId::new();
        let mut pattern_edges = HashSet::new();
        pattern_edges.insert((p1, p2));
        let mut target_edges = HashSet::new();
        target_edges.insert((t1, t2));
        target_edges.insert((t2, t3));
        let pattern = PatternGraph { nodes: vec![p1, p2], edges: pattern_edges };
        let target = PatternGraph { nodes: vec![t1, t2, t3], edges: target_edges };
        let algo = Vf2Isomorphism;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, _) = algo.process(&ctx, &snapshot, Vf2Input { pattern, target, max_matches: 10 }).unwrap();
        assert!(!output.matches.is_empty());
        for m in &output.matches {
            let distinct: HashSet<NodeId> = m.values().copied().collect();
            assert_eq!(distinct.len(), m.len());
        }
    }
}
