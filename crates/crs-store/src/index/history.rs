use crate::state::CrsState;
use crate::types::HistoryEntry;
use crs_types::NodeId;
use std::sync::Arc;

/// Recent-n entries, by-node. The store drops the oldest entries
/// FIFO once the configured cap is reached.
#[derive(Clone)]
pub struct HistoryIndex {
    state: Arc<CrsState>,
}

impl HistoryIndex {
    pub(crate) fn new(state: Arc<CrsState>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        let len = self.state.history.len();
        let start = len.saturating_sub(n);
        self.state.history.iter().skip(start).copied().collect()
    }

    #[must_use]
    pub fn by_node(&self, id: NodeId) -> Vec<HistoryEntry> {
        self.state
            .history
            .iter()
            .filter(|e| e.node_id == id)
            .copied()
            .collect()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.state.history.len()
    }
}
