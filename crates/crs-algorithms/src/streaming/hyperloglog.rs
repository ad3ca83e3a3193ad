//! HyperLogLog cardinality estimation over a small fixed register count,
//! sized for the CRS's per-session streaming index rather than for
//! web-scale cardinalities.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::types::StreamingRecord;
use crs_store::{Delta, DeltaKind, Snapshot, StreamingDelta};
use crs_types::{now_ms, SignalSource};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const NUM_REGISTERS: usize = 16;

#[derive(Debug, Clone)]
pub struct HyperLogLog {
    registers: [u8; NUM_REGISTERS],
}

impl Default for HyperLogLog {
    fn default() -> Self {
        Self { registers: [0; NUM_REGISTERS] }
    }
}

impl HyperLogLog {
    pub fn insert<T: Hash>(&mut self, item: &T) {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        let hash = hasher.finish();
        let register = (hash as usize) % NUM_REGISTERS;
        let rank = (hash >> 4).trailing_zeros() as u8 + 1;
        self.registers[register] = self.registers[register].max(rank);
    }

    #[must_use]
    pub fn estimate(&self) -> f64 {
        let m = NUM_REGISTERS as f64;
        let alpha = 0.7213 / (1.0 + 1.079 / m);
        let sum: f64 = self.registers.iter().map(|&r| 2f64.powi(-(i32::from(r)))).sum();
        alpha * m * m / sum
    }

    /// Register-wise max, the standard HLL merge: the result estimates the
    /// cardinality of the union of both streams. Commutative and
    /// associative since `max` is.
    pub fn merge(&mut self, other: &Self) {
        for (r, o) in self.registers.iter_mut().zip(other.registers.iter()) {
            *r = (*r).max(*o);
        }
    }
}

#[derive(Debug, Clone)]
pub struct HyperLogLogInput {
    pub items: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct HyperLogLogOutput {
    pub estimated_cardinality: f64,
}

#[derive(Default)]
pub struct HyperLogLogCounter;

impl Evaluable for HyperLogLogCounter {
    fn name(&self) -> &'static str {
        "hyperloglog"
    }
    fn input_type(&self) -> &'static str {
        "HyperLogLogInput"
    }
    fn output_type(&self) -> &'static str {
        "HyperLogLogOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(500)
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("bounded_error", "the estimate stays within this register count's expected relative error")]
    }
}

impl Algorithm for HyperLogLogCounter {
    type Input = HyperLogLogInput;
    type Output = HyperLogLogOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<Delta>), AlgorithmError> {
        let mut sketch = HyperLogLog::default();
        for item in &input.items {
            if ctx.is_cancelled() {
                return Err(AlgorithmError::Cancelled("hyperloglog insertion cancelled".into()));
            }
            sketch.insert(item);
        }
        let estimate = sketch.estimate();
        let delta = Delta::new(
            SignalSource::Soft,
            DeltaKind::Streaming(StreamingDelta {
                record: StreamingRecord { cardinality: estimate, approximate_bytes: NUM_REGISTERS },
            }),
            now_ms(),
        );
        Ok((HyperLogLogOutput { estimated_cardinality: estimate }, Some(delta)))
    }
}
