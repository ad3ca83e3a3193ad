use crate::state::CrsState;
use crate::types::Constraint;
use crs_types::NodeId;
use std::sync::Arc;

/// `find_by_node(id)`, iteration.
///
/// `find_by_node` must return every constraint whose node list contains the
/// id and no other.
#[derive(Clone)]
pub struct ConstraintIndex {
    state: Arc<CrsState>,
}

impl ConstraintIndex {
    pub(crate) fn new(state: Arc<CrsState>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn find_by_node(&self, id: NodeId) -> Vec<Constraint> {
        self.state
            .constraints
            .iter()
            .filter(|c| c.contains(id))
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Constraint> + '_ {
        self.state.constraints.iter().cloned()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.state.constraints.len()
    }
}
