//! The immutable state a `Snapshot` projects (internal to the crate).
//!
//! Backed by `im`'s persistent collections so `apply` can clone-and-mutate
//! cheaply (structural sharing) instead of copying the whole store on every
//! write — the same "immutable value, cheap clone" shape the store's
//! snapshot contract requires.

use crate::types::{AnalyticsRecord, Constraint, HistoryEntry, ProofNumber, SimilarityPair, StreamingRecord};
use crs_types::{Generation, NodeId};
use im::{HashMap as ImHashMap, HashSet as ImHashSet, Vector as ImVector};

#[derive(Clone, Default)]
pub(crate) struct CrsState {
    pub generation: Generation,
    pub proof: ImHashMap<NodeId, ProofNumber>,
    pub constraints: ImVector<Constraint>,
    pub dep_out: ImHashMap<NodeId, ImHashSet<NodeId>>,
    pub dep_in: ImHashMap<NodeId, ImHashSet<NodeId>>,
    pub similarity: ImVector<SimilarityPair>,
    pub history: ImVector<HistoryEntry>,
    pub streaming: Option<StreamingRecord>,
    pub analytics: ImVector<AnalyticsRecord>,
}
