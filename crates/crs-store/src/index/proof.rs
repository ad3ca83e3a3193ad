use crate::state::CrsState;
use crate::types::ProofNumber;
use crs_types::NodeId;
use std::sync::Arc;

/// `get(id) -> (proof_number, exists)`, `all()`, `size()`.
#[derive(Clone)]
pub struct ProofIndex {
    state: Arc<CrsState>,
}

impl ProofIndex {
    pub(crate) fn new(state: Arc<CrsState>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<ProofNumber> {
        self.state.proof.get(&id).copied()
    }

    #[must_use]
    pub fn all(&self) -> Vec<(NodeId, ProofNumber)> {
        self.state.proof.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.state.proof.len()
    }
}
