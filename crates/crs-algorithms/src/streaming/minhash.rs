//! MinHash signatures for Jaccard similarity estimation between node
//! neighbourhoods or token sets.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::Snapshot;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct MinHash {
    num_hashes: usize,
}

impl MinHash {
    #[must_use]
    pub fn new(num_hashes: usize) -> Self {
        Self { num_hashes: num_hashes.max(1) }
    }

    #[must_use]
    pub fn signature(&self, items: &HashSet<String>) -> Vec<u64> {
        (0..self.num_hashes)
            .map(|seed| {
                items
                    .iter()
                    .map(|item| {
                        let mut hasher = DefaultHasher::new();
                        (item, seed).hash(&mut hasher);
                        hasher.finish()
                    })
                    .min()
                    .unwrap_or(u64::MAX)
            })
            .collect()
    }

    #[must_use]
    pub fn estimate_similarity(&self, a: &[u64], b: &[u64]) -> f64 {
        if a.is_empty() || a.len() != b.len() {
            return 0.0;
        }
        let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
        matches as f64 / a.len() as f64
    }

    /// The signature of the set union, from two signatures over the same
    /// hash seeds: position-wise minimum, since each position already is the
    /// min hash over its own set.
    #[must_use]
    pub fn merge_signatures(a: &[u64], b: &[u64]) -> Vec<u64> {
        a.iter().zip(b).map(|(x, y)| (*x).min(*y)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct MinHashInput {
    pub a: HashSet<String>,
    pub b: HashSet<String>,
    pub num_hashes: usize,
}

#[derive(Debug, Clone)]
pub struct MinHashOutput {
    pub estimated_jaccard: f64,
}

#[derive(Default)]
pub struct MinHashEstimator;

impl Evaluable for MinHashEstimator {
    fn name(&self) -> &'static str {
        "minhash"
    }
    fn input_type(&self) -> &'static str {
        "MinHashInput"
    }
    fn output_type(&self) -> &'static str {
        "MinHashOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(500)
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("bounded_unit_interval", "the estimated similarity always lies in [0, 1]")]
    }
}

impl Algorithm for MinHashEstimator {
    type Input = MinHashInput;
    type Output = MinHashOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<crs_store::Delta>), AlgorithmError> {
        if ctx.is_cancelled() {
            return Err(AlgorithmError::Cancelled("minhash signature computation cancelled".into()));
        }
        let minhash = MinHash::new(input.num_hashes);
        let sig_a = minhash.signature(&input.a);
        let sig_b = minhash.signature(&input.b);
        let estimated_jaccard = minhash.estimate_similarity(&sig_a, &sig_b);
        Ok((MinHashOutput { estimated_jaccard }, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sets_estimate_perfect_similarity() {
        let minhash = MinHash::new(32);
        let set: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let sig = minhash.signature(&set);
        assert_eq!(minhash.estimate_similarity(&sig, &sig), 1.0);
    }

    #[test]
    fn disjoint_sets_estimate_low_similarity() {
        let minhash = MinHash::new(64);
        let a: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let b: HashSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let sig_a = minhash.signature(&a);
        let sig_b = minhash.signature(&b);
        assert!(minhash.estimate_similarity(&sig_a, &sig_b) < 0.5);
    }

    #[test]
    fn merging_a_signature_with_itself_is_idempotent() {
        let minhash = MinHash::new(16);
        let set: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let sig = minhash.signature(&set);
        assert_eq!(MinHash::merge_signatures(&sig, &sig), sig);
    }

    proptest::proptest! {
        #[test]
        fn estimated_similarity_always_lies_in_the_unit_interval(
            left in proptest::collection::hash_set("[a-j]", 0..20),
            right in proptest::collection::hash_set("[a-j]", 0..20),
        ) {
            let minhash = MinHash::new(32);
            let sig_a = minhash.signature(&left);
            let sig_b = minhash.signature(&right);
            let similarity = minhash.estimate_similarity(&sig_a, &sig_b);
            proptest::prop_assert!((0.0..=1.0).contains(&similarity));
        }

        #[test]
        fn merge_signatures_is_commutative(
            left in proptest::collection::hash_set("[a-j]", 1..20),
            right in proptest::collection::hash_set("[a-j]", 1..20),
        ) {
            let minhash = MinHash::new(16);
            let sig_a = minhash.signature(&left);
            let sig_b = minhash.signature(&right);
            proptest::prop_assert_eq!(
                MinHash::merge_signatures(&sig_a, &sig_b),
                MinHash::merge_signatures(&sig_b, &sig_a)
            );
        }
    }
}
