use crate::state::CrsState;
use crate::types::AnalyticsRecord;
use std::sync::Arc;

/// Last-by-type, has-run-type, full history.
#[derive(Clone)]
pub struct AnalyticsIndex {
    state: Arc<CrsState>,
}

impl AnalyticsIndex {
    pub(crate) fn new(state: Arc<CrsState>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn last_by_type(&self, query_type: &str) -> Option<AnalyticsRecord> {
        self.state
            .analytics
            .iter()
            .rev()
            .find(|r| r.query_type == query_type)
            .cloned()
    }

    #[must_use]
    pub fn has_run_type(&self, query_type: &str) -> bool {
        self.state.analytics.iter().any(|r| r.query_type == query_type)
    }

    #[must_use]
    pub fn history(&self) -> Vec<AnalyticsRecord> {
        self.state.analytics.iter().cloned().collect()
    }
}
