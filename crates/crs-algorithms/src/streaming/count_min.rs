//! Count-Min sketch: a fixed-width, fixed-depth array of counters updated by
//! `depth` independent hash functions; a frequency query takes the minimum
//! across rows, which can only overestimate, never underestimate.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::Snapshot;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct CountMinSketch {
    width: usize,
    depth: usize,
    table: Vec<Vec<u64>>,
}

impl CountMinSketch {
    #[must_use]
    pub fn new(width: usize, depth: usize) -> Self {
        Self { width: width.max(1), depth: depth.max(1), table: vec![vec![0; width.max(1)]; depth.max(1)] }
    }

    fn bucket(&self, item: &str, row: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        (item, row).hash(&mut hasher);
        (hasher.finish() as usize) % self.width
    }

    pub fn increment(&mut self, item: &str) {
        for row in 0..self.depth {
            let bucket = self.bucket(item, row);
            self.table[row][bucket] += 1;
        }
    }

    #[must_use]
    pub fn estimate(&self, item: &str) -> u64 {
        (0..self.depth).map(|row| self.table[row][self.bucket(item, row)]).min().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct CountMinInput {
    pub stream: Vec<String>,
    pub queries: Vec<String>,
    pub width: usize,
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub struct CountMinOutput {
    pub estimates: Vec<(String, u64)>,
}

#[derive(Default)]
pub struct CountMinEstimator;

impl Evaluable for CountMinEstimator {
    fn name(&self) -> &'static str {
        "count_min_sketch"
    }
    fn input_type(&self) -> &'static str {
        "CountMinInput"
    }
    fn output_type(&self) -> &'static str {
        "CountMinOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(500)
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("never_underestimates", "the reported frequency is never less than the item's true count")]
    }
}

impl Algorithm for CountMinEstimator {
    type Input = CountMinInput;
    type Output = CountMinOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<crs_store::Delta>), AlgorithmError> {
        let mut sketch = CountMinSketch::new(input.width, input.depth);
        for item in &input.stream {
            if ctx.is_cancelled() {
                return Err(AlgorithmError::Cancelled("count-min sketch update cancelled".into()));
            }
            sketch.increment(item);
        }
        let estimates = input.queries.into_iter().map(|q| {
            let count = sketch.estimate(&q);
            (q, count)
        }).collect();
        Ok((CountMinOutput { estimates }, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_never_underestimates_true_frequency() {
        let mut sketch = CountMinSketch::new(64, 4);
        for _ in 0..10 {
            sketch.increment("hot");
        }
        assert!(sketch.estimate("hot") >= 10);
    }

    #[test]
    fn unseen_item_may_still_report_zero_in_a_sparse_sketch() {
        let sketch = CountMinSketch::new(64, 4);
        assert_eq!(sketch.estimate("never-seen"), 0);
    }

    proptest::proptest! {
        #[test]
        fn estimate_is_never_below_the_true_frequency(
            stream in proptest::collection::vec("[a-e]", 0..200),
            query in "[a-e]",
        ) {
            let mut sketch = CountMinSketch::new(32, 4);
            let mut true_count: u64 = 0;
            for item in &stream {
                sketch.increment(item);
                if item == &query {
                    true_count += 1;
                }
            }
            proptest::prop_assert!(sketch.estimate(&query) >= true_count);
        }
    }
}
