use crate::state::CrsState;
use crs_types::NodeId;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// `depends_on(id)`, `depended_by(id)`, `has_cycle(id)`, `size`.
#[derive(Clone)]
pub struct DependencyIndex {
    state: Arc<CrsState>,
}

impl DependencyIndex {
    pub(crate) fn new(state: Arc<CrsState>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn depends_on(&self, id: NodeId) -> Vec<NodeId> {
        self.state
            .dep_out
            .get(&id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn depended_by(&self, id: NodeId) -> Vec<NodeId> {
        self.state
            .dep_in
            .get(&id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// `true` if following outgoing edges from `id` can reach `id` again.
    #[must_use]
    pub fn has_cycle(&self, id: NodeId) -> bool {
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = self.depends_on(id).into_iter().collect();
        while let Some(next) = queue.pop_front() {
            if next == id {
                return true;
            }
            if !visited.insert(next) {
                continue;
            }
            queue.extend(self.depends_on(next));
        }
        false
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.state
            .dep_out
            .iter()
            .map(|(_, v)| v.len())
            .sum::<usize>()
    }
}
