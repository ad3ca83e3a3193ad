use crate::state::CrsState;
use std::sync::Arc;

/// Cardinality estimate, approximate byte size.
#[derive(Clone)]
pub struct StreamingIndex {
    state: Arc<CrsState>,
}

impl StreamingIndex {
    pub(crate) fn new(state: Arc<CrsState>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn cardinality_estimate(&self) -> f64 {
        self.state.streaming.map(|r| r.cardinality).unwrap_or(0.0)
    }

    #[must_use]
    pub fn approximate_bytes(&self) -> usize {
        self.state.streaming.map(|r| r.approximate_bytes).unwrap_or(0)
    }
}
