//! Process-wide, immutable-after-init algorithm registry.
//!
//! Concrete algorithms are statically typed (`Algorithm::Input`/`Output`
//! differ per family) so, like the `StrategyRegistry`, this is a
//! lightweight descriptor registry rather than a trait-object table: callers
//! look up a [`AlgorithmDescriptor`] to validate a name/type pair, then
//! invoke the concrete algorithm value directly.

use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AlgorithmDescriptor {
    pub name: &'static str,
    pub family: AlgorithmFamily,
    pub input_type: &'static str,
    pub output_type: &'static str,
    pub timeout: Duration,
    pub supports_partial_results: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    Planning,
    Search,
    Graph,
    Streaming,
}

#[derive(Debug, Default)]
pub struct AlgorithmRegistry {
    descriptors: HashMap<&'static str, AlgorithmDescriptor>,
}

impl AlgorithmRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { descriptors: HashMap::new() }
    }

    pub fn register(&mut self, descriptor: AlgorithmDescriptor) {
        self.descriptors.insert(descriptor.name, descriptor);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AlgorithmDescriptor> {
        self.descriptors.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.keys().copied().collect()
    }

    #[must_use]
    pub fn by_family(&self, family: AlgorithmFamily) -> Vec<&AlgorithmDescriptor> {
        self.descriptors.values().filter(|d| d.family == family).collect()
    }

    /// Validate an (name, input_type) pair the way the runtime does before
    /// calling `Algorithm::process`.
    pub fn validate_input(&self, name: &str, actual_input_type: &str) -> Result<(), crate::error::AlgorithmError> {
        tracing::debug!(algorithm = name, input_type = actual_input_type, "validating algorithm invocation");
        match self.get(name) {
            None => Err(crate::error::AlgorithmError::InvalidInput {
                expected: "registered algorithm",
                actual: "unknown name",
            }),
            Some(d) if d.input_type != actual_input_type => Err(crate::error::AlgorithmError::InvalidInput {
                expected: d.input_type,
                actual: "mismatched type",
            }),
            Some(_) => Ok(()),
        }
    }

    /// All fifteen planning/search/graph/streaming algorithms, pre-registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut r = Self::new();
        use AlgorithmFamily::{Graph, Planning, Search, Streaming};
        let d = |name, family, input_type, output_type, timeout_ms, partial| AlgorithmDescriptor {
            name,
            family,
            input_type,
            output_type,
            timeout: Duration::from_millis(timeout_ms),
            supports_partial_results: partial,
        };
        r.register(d("blackboard", Planning, "BlackboardInput", "BlackboardOutput", 2_000, false));
        r.register(d("htn", Planning, "HtnInput", "HtnOutput", 2_000, false));
        r.register(d("cdcl_conflict_learning", Search, "CdclInput", "CdclOutput", 1_000, false));
        r.register(d("watched_literals", Search, "WatchedLiteralsInput", "WatchedLiteralsOutput", 1_000, true));
        r.register(d("unit_propagation", Search, "UnitPropagationInput", "UnitPropagationOutput", 1_000, false));
        r.register(d("pn_mcts", Search, "PnMctsInput", "PnMctsOutput", 3_000, true));
        r.register(d("transposition_table", Search, "TranspositionInput", "TranspositionOutput", 500, false));
        r.register(d("tarjan_scc", Graph, "TarjanInput", "TarjanOutput", 2_000, false));
        r.register(d("vf2_isomorphism", Graph, "Vf2Input", "Vf2Output", 5_000, true));
        r.register(d("weisfeiler_leman", Graph, "WeisfeilerLemanInput", "WeisfeilerLemanOutput", 2_000, true));
        r.register(d("hyperloglog", Streaming, "HyperLogLogInput", "HyperLogLogOutput", 500, false));
        r.register(d("count_min_sketch", Streaming, "CountMinInput", "CountMinOutput", 500, false));
        r.register(d("minhash", Streaming, "MinHashInput", "MinHashOutput", 500, false));
        r.register(d("lsh", Streaming, "LshInput", "LshOutput", 500, false));
        r.register(d("agm_sketch", Streaming, "AgmInput", "AgmOutput", 500, false));
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_register_all_fifteen_algorithms() {
        let r = AlgorithmRegistry::with_defaults();
        assert_eq!(r.names().len(), 15);
        assert!(r.contains("pn_mcts"));
        assert!(r.contains("agm_sketch"));
    }

    #[test]
    fn validate_input_rejects_unknown_name() {
        let r = AlgorithmRegistry::with_defaults();
        assert!(r.validate_input("does_not_exist", "X").is_err());
    }

    #[test]
    fn validate_input_rejects_type_mismatch() {
        let r = AlgorithmRegistry::with_defaults();
        assert!(r.validate_input("pn_mcts", "WrongType").is_err());
        assert!(r.validate_input("pn_mcts", "PnMctsInput").is_ok());
    }

    #[test]
    fn by_family_filters_correctly() {
        let r = AlgorithmRegistry::with_defaults();
        assert_eq!(r.by_family(AlgorithmFamily::Streaming).len(), 5);
        assert_eq!(r.by_family(AlgorithmFamily::Search).len(), 5);
        assert_eq!(r.by_family(AlgorithmFamily::Graph).len(), 3);
        assert_eq!(r.by_family(AlgorithmFamily::Planning).len(), 2);
    }
}
