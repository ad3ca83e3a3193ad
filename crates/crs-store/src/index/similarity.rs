use crate::state::CrsState;
use crate::types::SimilarityPair;
use std::sync::Arc;

/// Pair iteration, size.
#[derive(Clone)]
pub struct SimilarityIndex {
    state: Arc<CrsState>,
}

impl SimilarityIndex {
    pub(crate) fn new(state: Arc<CrsState>) -> Self {
        Self { state }
    }

    pub fn iter(&self) -> impl Iterator<Item = SimilarityPair> + '_ {
        self.state.similarity.iter().copied()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.state.similarity.len()
    }
}
