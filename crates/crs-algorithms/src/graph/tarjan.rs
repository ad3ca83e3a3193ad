//! Tarjan's strongly-connected-components algorithm over the dependency
//! graph. Every node processed ends up in exactly one component, so the
//! sizes of the returned components always sum to the node count.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::Snapshot;
use crs_types::NodeId;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TarjanInput {
    pub adjacency: HashMap<NodeId, Vec<NodeId>>,
}

#[derive(Debug, Clone)]
pub struct TarjanOutput {
    pub components: Vec<Vec<NodeId>>,
    pub nodes_processed: usize,
}

#[derive(Default)]
pub struct TarjanScc;

impl Evaluable for TarjanScc {
    fn name(&self) -> &'static str {
        "tarjan_scc"
    }
    fn input_type(&self) -> &'static str {
        "TarjanInput"
    }
    fn output_type(&self) -> &'static str {
        "TarjanOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(2)
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("partition_covers_all_nodes", "the sum of component sizes equals the number of nodes processed")]
    }
}

impl Algorithm for TarjanScc {
    type Input = TarjanInput;
    type Output = TarjanOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<crs_store::Delta>), AlgorithmError> {
        let mut graph: DiGraphMap<NodeId, ()> = DiGraphMap::new();
        for node in input.adjacency.keys() {
            graph.add_node(*node);
        }
        for (from, tos) in &input.adjacency {
            for to in tos {
                graph.add_edge(*from, *to, ());
            }
        }
        if ctx.is_cancelled() {
            return Err(AlgorithmError::Cancelled("tarjan scc cancelled".into()));
        }
        let components = petgraph::algo::tarjan_scc(&graph);
        let nodes_processed = graph.node_count();
        Ok((TarjanOutput { components, nodes_processed }, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_collapses_into_one_component() {
        let a = NodeId::new();
        let b = NodeId::new();
        let c = NodeId::new();
        let mut adjacency = HashMap::new();
        adjacency.insert(a, vec![b]);
        adjacency.insert(b, vec![c]);
        adjacency.insert(c, vec![a]);
        let algo = TarjanScc;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, _) = algo.process(&ctx, &snapshot, TarjanInput { adjacency }).unwrap();
        assert_eq!(output.components.len(), 1);
        assert_eq!(output.components[0].len(), 3);
    }

    #[test]
    fn component_sizes_sum_to_nodes_processed() {
        let a = NodeId::new();
        let b = NodeId::new();
        let mut adjacency = HashMap::new();
        adjacency.insert(a, vec![b]);
        adjacency.insert(b, vec![]);
        let algo = TarjanScc;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, _) = algo.process(&ctx, &snapshot, TarjanInput { adjacency }).unwrap();
        let total: usize = output.components.iter().map(Vec::len).sum();
        assert_eq!(total, output.nodes_processed);
    }
}
