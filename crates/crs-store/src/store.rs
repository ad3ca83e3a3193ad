//! `CrsStore` — owner of current state, producer of snapshots.

use crate::delta::{Delta, DeltaKind};
use crate::error::{DeltaValidationError, StoreError};
use crate::snapshot::Snapshot;
use crate::state::CrsState;
use crs_types::{now_ms, Generation};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

/// Configuration for the CRS store.
#[derive(Debug, Clone, Copy)]
pub struct CrsConfig {
    /// FIFO cap on the History index.
    pub history_cap: usize,
    /// When `true`, constraint additions referencing nodes with no Proof
    /// entry in the current generation are rejected.
    pub strict: bool,
}

impl Default for CrsConfig {
    fn default() -> Self {
        Self { history_cap: 10_000, strict: false }
    }
}

pub struct CrsStore {
    current: RwLock<Arc<CrsState>>,
    config: CrsConfig,
    tx: watch::Sender<Generation>,
}

impl CrsStore {
    #[must_use]
    pub fn new(config: CrsConfig) -> Self {
        let (tx, _rx) = watch::channel(Generation::ZERO);
        Self {
            current: RwLock::new(Arc::new(CrsState::default())),
            config,
            tx,
        }
    }

    /// Cheap, lock-free-for-readers snapshot. Read-your-own-writes: a
    /// snapshot taken after `apply` returns observes generation >= the
    /// generation `apply` returned.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let state = self.current.read().clone();
        Snapshot::seal(state)
    }

    /// Subscribe to generation-change notifications.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Generation> {
        self.tx.subscribe()
    }

    /// Validate and atomically apply a delta, bumping the generation.
    pub fn apply(&self, delta: Delta) -> Result<Generation, StoreError> {
        if delta.is_empty() {
            return Err(StoreError::NilDelta);
        }

        if !delta.source.may_write_terminal() {
            let terminal = delta.terminal_writes();
            if let Some(node_id) = terminal.into_iter().next() {
                return Err(StoreError::DeltaValidation(
                    DeltaValidationError::SoftSignalTerminalWrite(node_id),
                ));
            }
        }

        // Build the next state from the current one. `im` collections make
        // this an O(log n)-per-edit structural-sharing clone, not a deep copy.
        let mut next: CrsState = (**self.current.read()).clone();

        match &delta.kind {
            DeltaKind::Proof(d) => {
                for update in &d.updates {
                    next.proof.insert(
                        update.node_id,
                        crate::types::ProofNumber {
                            proof: update.proof.max(if update.status.is_terminal() { 0 } else { 1 }),
                            disproof: update.disproof.max(if update.status.is_terminal() { 0 } else { 1 }),
                            status: update.status,
                            source: delta.source,
                            updated_at: delta.produced_at,
                        },
                    );
                }
            }
            DeltaKind::Constraint(d) => {
                for c in &d.added {
                    if self.config.strict {
                        for node in &c.nodes {
                            if !next.proof.contains_key(node) {
                                return Err(StoreError::DeltaValidation(
                                    DeltaValidationError::UnknownNode(*node),
                                ));
                            }
                        }
                    }
                    next.constraints.push_back(c.clone());
                }
            }
            DeltaKind::Dependency(d) => {
                for edge in &d.added_edges {
                    if edge.from == edge.to {
                        return Err(StoreError::DeltaValidation(DeltaValidationError::SelfLoop {
                            from: edge.from,
                            to: edge.to,
                        }));
                    }
                    let mut out = next.dep_out.get(&edge.from).cloned().unwrap_or_default();
                    out.insert(edge.to);
                    next.dep_out.insert(edge.from, out);

                    let mut inc = next.dep_in.get(&edge.to).cloned().unwrap_or_default();
                    inc.insert(edge.from);
                    next.dep_in.insert(edge.to, inc);
                }
            }
            DeltaKind::Similarity(d) => {
                for pair in &d.added_pairs {
                    next.similarity.push_back(*pair);
                }
            }
            DeltaKind::History(d) => {
                if self.config.history_cap == 0 {
                    return Err(StoreError::DeltaValidation(DeltaValidationError::ZeroCap));
                }
                for node_id in &d.visited {
                    next.history.push_back(crate::types::HistoryEntry {
                        node_id: *node_id,
                        visited_at: delta.produced_at,
                    });
                }
                while next.history.len() > self.config.history_cap {
                    next.history.pop_front();
                }
            }
            DeltaKind::Streaming(d) => {
                next.streaming = Some(d.record);
            }
            DeltaKind::Analytics(d) => {
                for record in &d.added {
                    next.analytics.push_back(record.clone());
                }
            }
        }

        next.generation = next.generation.next();
        let new_gen = next.generation;

        {
            let mut guard = self.current.write();
            *guard = Arc::new(next);
        }
        let _ = self.tx.send(new_gen);

        tracing::debug!(generation = new_gen.0, source = ?delta.source, "applied delta");
        Ok(new_gen)
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.current.read().generation
    }
}

impl Default for CrsStore {
    fn default() -> Self {
        Self::new(CrsConfig::default())
    }
}

/// Helper for building a `ProofUpdate` timestamp from the current time,
/// matching the rest of the reasoning substrate's single-clock-read rule.
#[must_use]
pub fn stamp_now() -> u64 {
    now_ms()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::{Delta, DeltaKind, DependencyDelta, HistoryDelta, ProofDelta, ProofUpdate};
    use crate::types::DependencyEdge;
    use crs_types::{NodeId, ProofStatus, SignalSource};

    #[test]
    fn generation_is_strictly_monotonic() {
        let store = CrsStore::default();
        let g0 = store.generation();
        let node = NodeId::new();
        let delta = Delta::new(
            SignalSource::Soft,
            DeltaKind::Proof(ProofDelta {
                updates: vec![ProofUpdate {
                    node_id: node,
                    proof: 3,
                    disproof: 5,
                    status: ProofStatus::Unknown,
                }],
            }),
            stamp_now(),
        );
        let g1 = store.apply(delta).unwrap();
        assert!(g1 > g0);
        assert_eq!(store.generation(), g1);
    }

    #[test]
    fn nil_delta_is_rejected() {
        let store = CrsStore::default();
        let delta = Delta::new(SignalSource::Hard, DeltaKind::Proof(ProofDelta::default()), stamp_now());
        assert!(matches!(store.apply(delta), Err(StoreError::NilDelta)));
    }

    #[test]
    fn soft_delta_cannot_write_terminal_status() {
        let store = CrsStore::default();
        let node = NodeId::new();
        let delta = Delta::new(
            SignalSource::Soft,
            DeltaKind::Proof(ProofDelta {
                updates: vec![ProofUpdate {
                    node_id: node,
                    proof: 0,
                    disproof: 0,
                    status: ProofStatus::Proven,
                }],
            }),
            stamp_now(),
        );
        let err = store.apply(delta).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DeltaValidation(DeltaValidationError::SoftSignalTerminalWrite(_))
        ));
    }

    #[test]
    fn hard_delta_may_write_terminal_status() {
        let store = CrsStore::default();
        let node = NodeId::new();
        let delta = Delta::new(
            SignalSource::Hard,
            DeltaKind::Proof(ProofDelta {
                updates: vec![ProofUpdate {
                    node_id: node,
                    proof: 0,
                    disproof: 0,
                    status: ProofStatus::Disproven,
                }],
            }),
            stamp_now(),
        );
        store.apply(delta).unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.proof().get(node).unwrap().status, ProofStatus::Disproven);
    }

    #[test]
    fn self_loop_edge_is_rejected() {
        let store = CrsStore::default();
        let node = NodeId::new();
        let delta = Delta::new(
            SignalSource::Hard,
            DeltaKind::Dependency(DependencyDelta {
                added_edges: vec![DependencyEdge { from: node, to: node }],
            }),
            stamp_now(),
        );
        assert!(store.apply(delta).is_err());
    }

    #[test]
    fn snapshot_is_prefix_consistent_across_generations() {
        let store = CrsStore::default();
        let a = NodeId::new();
        let b = NodeId::new();
        store
            .apply(Delta::new(
                SignalSource::Hard,
                DeltaKind::Dependency(DependencyDelta {
                    added_edges: vec![DependencyEdge { from: a, to: b }],
                }),
                stamp_now(),
            ))
            .unwrap();
        let snap1 = store.snapshot();
        assert_eq!(snap1.dependency().depends_on(a), vec![b]);

        store
            .apply(Delta::new(
                SignalSource::Hard,
                DeltaKind::History(HistoryDelta { visited: vec![a] }),
                stamp_now(),
            ))
            .unwrap();

        // snap1 must still reflect exactly its own generation's facts.
        assert_eq!(snap1.history().size(), 0);
        let snap2 = store.snapshot();
        assert_eq!(snap2.history().size(), 1);
        assert!(snap2.generation() > snap1.generation());
    }

    #[test]
    fn history_is_fifo_capped() {
        let store = CrsStore::new(CrsConfig { history_cap: 2, strict: false });
        let nodes: Vec<NodeId> = (0..5).map(|_| NodeId::new()).collect();
        for n in &nodes {
            store
                .apply(Delta::new(
                    SignalSource::Hard,
                    DeltaKind::History(HistoryDelta { visited: vec![*n] }),
                    stamp_now(),
                ))
                .unwrap();
        }
        let snap = store.snapshot();
        assert_eq!(snap.history().size(), 2);
    }

    #[test]
    fn strict_mode_rejects_constraint_on_unknown_node() {
        use crate::delta::ConstraintDelta;
        use crate::types::{Constraint, ConstraintKind};
        use crs_types::ConstraintId;

        let store = CrsStore::new(CrsConfig { history_cap: 100, strict: true });
        let unknown = NodeId::new();
        let delta = Delta::new(
            SignalSource::Hard,
            DeltaKind::Constraint(ConstraintDelta {
                added: vec![Constraint {
                    id: ConstraintId::new(),
                    kind: ConstraintKind::MutualExclusion,
                    nodes: vec![unknown],
                }],
            }),
            stamp_now(),
        );
        assert!(store.apply(delta).is_err());
    }

    #[test]
    fn snapshot_summary_matches_expected_after_two_deltas() {
        use pretty_assertions::assert_eq;

        let store = CrsStore::default();
        let a = NodeId::new();
        let b = NodeId::new();
        store
            .apply(Delta::new(
                SignalSource::Hard,
                DeltaKind::Dependency(DependencyDelta { added_edges: vec![DependencyEdge { from: a, to: b }] }),
                stamp_now(),
            ))
            .unwrap();
        store
            .apply(Delta::new(SignalSource::Hard, DeltaKind::History(HistoryDelta { visited: vec![a] }), stamp_now()))
            .unwrap();
        let snap = store.snapshot();
        let summary = (snap.dependency().size(), snap.history().size());
        assert_eq!(summary, (1, 1));
    }

    proptest::proptest! {
        #[test]
        fn generation_never_decreases_across_a_random_visit_sequence(picks in proptest::collection::vec(0usize..5, 1..20)) {
            let store = CrsStore::default();
            let nodes: Vec<NodeId> = (0..5).map(|_| NodeId::new()).collect();
            let mut last = store.generation();
            for pick in picks {
                let gen = store
                    .apply(Delta::new(
                        SignalSource::Hard,
                        DeltaKind::History(HistoryDelta { visited: vec![nodes[pick]] }),
                        stamp_now(),
                    ))
                    .unwrap();
                proptest::prop_assert!(gen > last);
                last = gen;
            }
        }
    }
}
