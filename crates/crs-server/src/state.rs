//! Shared application state handed to every route.

use crate::services::{ExternalServices, NullExternalServices};
use crs_algorithms::AlgorithmRegistry;
use crs_session::{Budget, SessionRegistry};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub algorithms: Arc<AlgorithmRegistry>,
    pub services: Arc<dyn ExternalServices>,
    pub default_budget: Budget,
}

impl AppState {
    #[must_use]
    pub fn new(services: Arc<dyn ExternalServices>, default_budget: Budget) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new()),
            algorithms: Arc::new(AlgorithmRegistry::with_defaults()),
            services,
            default_budget,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(NullExternalServices), Budget::default())
    }
}
