//! AGM (Alon-Gibbons-Matias) sketch for approximate distinct-element
//! counting over a node-visit stream, using pairwise-independent hashing
//! rather than HyperLogLog's register-bucket scheme. This is treated as an
//! advisory cross-check against the HyperLogLog estimate, never as the
//! index's authoritative cardinality: its emitted delta always carries
//! `SignalSource::Soft`.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::types::StreamingRecord;
use crs_store::{Delta, DeltaKind, Snapshot, StreamingDelta};
use crs_types::{now_ms, SignalSource};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct AgmSketch {
    num_trials: usize,
}

impl AgmSketch {
    #[must_use]
    pub fn new(num_trials: usize) -> Self {
        Self { num_trials: num_trials.max(1) }
    }

    #[must_use]
    pub fn estimate<T: Hash>(&self, items: &[T]) -> f64 {
        let mut best = 0u32;
        for trial in 0..self.num_trials {
            let mut max_trailing_zeros = 0u32;
            for item in items {
                let mut hasher = DefaultHasher::new();
                (item, trial).hash(&mut hasher);
                let hash = hasher.finish();
                max_trailing_zeros = max_trailing_zeros.max(hash.trailing_zeros());
            }
            best = best.max(max_trailing_zeros);
        }
        2f64.powi(best as i32)
    }
}

#[derive(Debug, Clone)]
pub struct AgmInput {
    pub items: Vec<String>,
    pub num_trials: usize,
}

#[derive(Debug, Clone)]
pub struct AgmOutput {
    pub estimated_cardinality: f64,
}

#[derive(Default)]
pub struct AgmEstimator;

impl Evaluable for AgmEstimator {
    fn name(&self) -> &'static str {
        "agm_sketch"
    }
    fn input_type(&self) -> &'static str {
        "AgmInput"
    }
    fn output_type(&self) -> &'static str {
        "AgmOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(500)
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("advisory_only", "this sketch's cardinality estimate is never treated as authoritative over HyperLogLog's")]
    }
}

impl Algorithm for AgmEstimator {
    type Input = AgmInput;
    type Output = AgmOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<Delta>), AlgorithmError> {
        if ctx.is_cancelled() {
            return Err(AlgorithmError::Cancelled("agm sketch computation cancelled".into()));
        }
        let sketch = AgmSketch::new(input.num_trials);
        let estimate = sketch.estimate(&input.items);
        let delta = Delta::new(
            SignalSource::Soft,
            DeltaKind::Streaming(StreamingDelta {
                record: StreamingRecord { cardinality: estimate, approximate_bytes: input.num_trials.max(1) * 8 },
            }),
            now_ms(),
        );
        Ok((AgmOutput { estimated_cardinality: estimate }, Some(delta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_is_always_a_power_of_two() {
        let sketch = AgmSketch::new(8);
        let items: Vec<String> = (0..50).map(|i| format!("item-{i}")).collect();
        let estimate = sketch.estimate(&items);
        assert!(estimate >= 1.0);
        assert_eq!(estimate.log2().fract(), 0.0);
    }

    #[test]
    fn emitted_delta_is_always_soft() {
        let estimator = AgmEstimator;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let items: Vec<String> = (0..10).map(|i| format!("x-{i}")).collect();
        let (_, delta) = estimator.process(&ctx, &snapshot, AgmInput { items, num_trials: 4 }).unwrap();
        let Some(delta) = delta else { panic!("expected a delta") };
        assert!(matches!(delta.source, crs_types::SignalSource::Soft));
    }
}
