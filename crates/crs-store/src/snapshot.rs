//! `Snapshot` — an immutable, generation-stamped projection of the CRS.
//!
//! `Snapshot` has no public constructor: it can only be produced by
//! `CrsStore::snapshot()`. This is the same sealed-proof-carrying-type shape
//! is used for its validated graph (construction-time proof that
//! the only way to reach an immutable value is through the owning store).

use crate::index::{
    AnalyticsIndex, ConstraintIndex, DependencyIndex, HistoryIndex, ProofIndex, SimilarityIndex,
    StreamingIndex,
};
use crate::state::CrsState;
use crs_types::Generation;
use std::sync::Arc;

#[derive(Clone)]
pub struct Snapshot {
    state: Arc<CrsState>,
}

impl Snapshot {
    pub(crate) fn seal(state: Arc<CrsState>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.state.generation
    }

    #[must_use]
    pub fn proof(&self) -> ProofIndex {
        ProofIndex::new(self.state.clone())
    }

    #[must_use]
    pub fn constraint(&self) -> ConstraintIndex {
        ConstraintIndex::new(self.state.clone())
    }

    #[must_use]
    pub fn dependency(&self) -> DependencyIndex {
        DependencyIndex::new(self.state.clone())
    }

    #[must_use]
    pub fn similarity(&self) -> SimilarityIndex {
        SimilarityIndex::new(self.state.clone())
    }

    #[must_use]
    pub fn history(&self) -> HistoryIndex {
        HistoryIndex::new(self.state.clone())
    }

    #[must_use]
    pub fn streaming(&self) -> StreamingIndex {
        StreamingIndex::new(self.state.clone())
    }

    #[must_use]
    pub fn analytics(&self) -> AnalyticsIndex {
        AnalyticsIndex::new(self.state.clone())
    }
}
