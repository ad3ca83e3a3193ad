//! Locality-sensitive hashing over MinHash signatures: bands of the
//! signature are hashed together so items sharing a band land in the same
//! bucket, giving sub-quadratic candidate-pair generation for similarity
//! search.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crate::streaming::minhash::MinHash;
use crs_store::Snapshot;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct Lsh {
    bands: usize,
    rows_per_band: usize,
}

impl Lsh {
    #[must_use]
    pub fn new(bands: usize, rows_per_band: usize) -> Self {
        Self { bands: bands.max(1), rows_per_band: rows_per_band.max(1) }
    }

    #[must_use]
    pub fn num_hashes(&self) -> usize {
        self.bands * self.rows_per_band
    }

    #[must_use]
    pub fn bucket_keys(&self, signature: &[u64]) -> Vec<u64> {
        signature
            .chunks(self.rows_per_band)
            .map(|band| {
                let mut hasher = DefaultHasher::new();
                band.hash(&mut hasher);
                hasher.finish()
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct LshInput {
    pub items: HashMap<String, HashSet<String>>,
    pub bands: usize,
    pub rows_per_band: usize,
}

#[derive(Debug, Clone)]
pub struct LshOutput {
    pub candidate_pairs: Vec<(String, String)>,
}

#[derive(Default)]
pub struct LshIndexer;

impl Evaluable for LshIndexer {
    fn name(&self) -> &'static str {
        "lsh"
    }
    fn input_type(&self) -> &'static str {
        "LshInput"
    }
    fn output_type(&self) -> &'static str {
        "LshOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(500)
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("no_duplicate_pairs", "the same unordered pair of items never appears twice in the candidate list")]
    }
}

impl Algorithm for LshIndexer {
    type Input = LshInput;
    type Output = LshOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<crs_store::Delta>), AlgorithmError> {
        let lsh = Lsh::new(input.bands, input.rows_per_band);
        let minhash = MinHash::new(lsh.num_hashes());
        let mut buckets: HashMap<(usize, u64), Vec<String>> = HashMap::new();
        for (name, set) in &input.items {
            if ctx.is_cancelled() {
                return Err(AlgorithmError::Cancelled("lsh indexing cancelled".into()));
            }
            let signature = minhash.signature(set);
            for (band_idx, key) in lsh.bucket_keys(&signature).into_iter().enumerate() {
                buckets.entry((band_idx, key)).or_default().push(name.clone());
            }
        }
        let mut seen_pairs = HashSet::new();
        let mut candidate_pairs = Vec::new();
        for members in buckets.values() {
            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    let pair = if members[i] < members[j] {
                        (members[i].clone(), members[j].clone())
                    } else {
                        (members[j].clone(), members[i].clone())
                    };
                    if seen_pairs.insert(pair.clone()) {
                        candidate_pairs.push(pair);
                    }
                }
            }
        }
        Ok((LshOutput { candidate_pairs }, None))
    }
}
