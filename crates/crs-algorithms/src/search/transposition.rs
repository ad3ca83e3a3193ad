//! Hash-keyed position cache shared across search calls within one
//! algorithm invocation; entries are replaced only by a deeper re-search of
//! the same position, so two live entries for one hash always agree on
//! value.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::Snapshot;
use std::collections::HashMap;

pub type PositionHash = u64;

#[derive(Debug, Clone)]
pub struct TranspositionEntry {
    pub hash: PositionHash,
    pub depth: u32,
    pub value: i64,
}

#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<PositionHash, TranspositionEntry>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: TranspositionEntry) {
        match self.entries.get(&entry.hash) {
            Some(existing) if existing.depth >= entry.depth => {}
            _ => {
                self.entries.insert(entry.hash, entry);
            }
        }
    }

    #[must_use]
    pub fn get(&self, hash: PositionHash) -> Option<&TranspositionEntry> {
        self.entries.get(&hash)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TranspositionInput {
    pub lookups: Vec<PositionHash>,
    pub inserts: Vec<TranspositionEntry>,
}

#[derive(Debug, Clone)]
pub struct TranspositionOutput {
    pub hits: Vec<(PositionHash, i64)>,
    pub table_size: usize,
}

#[derive(Default)]
pub struct TranspositionProbe;

impl Evaluable for TranspositionProbe {
    fn name(&self) -> &'static str {
        "transposition_table"
    }
    fn input_type(&self) -> &'static str {
        "TranspositionInput"
    }
    fn output_type(&self) -> &'static str {
        "TranspositionOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(500)
    }
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("hash_consistency", "two entries sharing a hash and having sufficient depth agree on value")]
    }
}

impl Algorithm for TranspositionProbe {
    type Input = TranspositionInput;
    type Output = TranspositionOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<crs_store::Delta>), AlgorithmError> {
        let mut table = TranspositionTable::new();
        for entry in input.inserts {
            if ctx.is_cancelled() {
                return Err(AlgorithmError::Cancelled("transposition table build cancelled".into()));
            }
            table.insert(entry);
        }
        let hits = input.lookups.into_iter().filter_map(|h| table.get(h).map(|e| (h, e.value))).collect();
        Ok((TranspositionOutput { hits, table_size: table.len() }, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deeper_entry_replaces_shallower_one_for_the_same_hash() {
        let mut table = TranspositionTable::new();
        table.insert(TranspositionEntry { hash: 7, depth: 2, value: 10 });
        table.insert(TranspositionEntry { hash: 7, depth: 5, value: 20 });
        assert_eq!(table.get(7).unwrap().value, 20);
        table.insert(TranspositionEntry { hash: 7, depth: 1, value: 99 });
        assert_eq!(table.get(7).unwrap().value, 20);
    }

    #[test]
    fn probe_reports_only_hits_present_after_inserts() {
        let probe = TranspositionProbe;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let input = TranspositionInput {
            lookups: vec![1, 2],
            inserts: vec![TranspositionEntry { hash: 1, depth: 3, value: 42 }],
        };
        let (output, _) = probe.process(&ctx, &snapshot, input).unwrap();
        assert_eq!(output.hits, vec![(1, 42)]);
        assert_eq!(output.table_size, 1);
    }
}
