//! Typed mutation descriptors.
//!
//! Every delta is tagged with the [`SignalSource`] that produced it. The
//! store — not the algorithm — is the single place that enforces the
//! soft-signal safety invariant: a `Soft` delta is refused outright if it
//! would move any node to a terminal status.

use crate::types::{AnalyticsRecord, Constraint, DependencyEdge, SimilarityPair, StreamingRecord};
use crs_types::{NodeId, ProofStatus, SignalSource, TimestampMs};

/// One proposed update to a node's proof number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProofUpdate {
    pub node_id: NodeId,
    pub proof: u64,
    pub disproof: u64,
    pub status: ProofStatus,
}

/// Mutation of the Proof index.
#[derive(Debug, Clone, Default)]
pub struct ProofDelta {
    pub updates: Vec<ProofUpdate>,
}

/// Mutation of the Constraint index. Additions are never silently dropped
///; unknown-node rejection only applies in strict
/// mode, threaded through by the caller via `CrsStore::apply_strict`.
#[derive(Debug, Clone, Default)]
pub struct ConstraintDelta {
    pub added: Vec<Constraint>,
}

/// Mutation of the Dependency index.
#[derive(Debug, Clone, Default)]
pub struct DependencyDelta {
    pub added_edges: Vec<DependencyEdge>,
}

/// Mutation of the Similarity index.
#[derive(Debug, Clone, Default)]
pub struct SimilarityDelta {
    pub added_pairs: Vec<SimilarityPair>,
}

/// Mutation of the History index; visits are FIFO-capped by the store.
#[derive(Debug, Clone, Default)]
pub struct HistoryDelta {
    pub visited: Vec<NodeId>,
}

/// Mutation of the Streaming index.
#[derive(Debug, Clone)]
pub struct StreamingDelta {
    pub record: StreamingRecord,
}

/// Mutation of the Analytics index.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsDelta {
    pub added: Vec<AnalyticsRecord>,
}

/// The typed union of all delta kinds an algorithm may return.
#[derive(Debug, Clone)]
pub enum DeltaKind {
    Proof(ProofDelta),
    Constraint(ConstraintDelta),
    Dependency(DependencyDelta),
    Similarity(SimilarityDelta),
    History(HistoryDelta),
    Streaming(StreamingDelta),
    Analytics(AnalyticsDelta),
}

/// A signal-tagged mutation proposal returned by an algorithm and consumed
/// by `CrsStore::apply`.
#[derive(Debug, Clone)]
pub struct Delta {
    pub source: SignalSource,
    pub kind: DeltaKind,
    pub produced_at: TimestampMs,
}

impl Delta {
    #[must_use]
    pub fn new(source: SignalSource, kind: DeltaKind, produced_at: TimestampMs) -> Self {
        Self { source, kind, produced_at }
    }

    /// `true` if this delta is empty and `apply` should reject it as nil.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            DeltaKind::Proof(d) => d.updates.is_empty(),
            DeltaKind::Constraint(d) => d.added.is_empty(),
            DeltaKind::Dependency(d) => d.added_edges.is_empty(),
            DeltaKind::Similarity(d) => d.added_pairs.is_empty(),
            DeltaKind::History(d) => d.visited.is_empty(),
            DeltaKind::Streaming(_) => false,
            DeltaKind::Analytics(d) => d.added.is_empty(),
        }
    }

    /// Returns the terminal-status node ids this delta would write, if any.
    /// Used by the store to enforce soft-signal safety before applying.
    #[must_use]
    pub fn terminal_writes(&self) -> Vec<NodeId> {
        match &self.kind {
            DeltaKind::Proof(d) => d
                .updates
                .iter()
                .filter(|u| u.status.is_terminal())
                .map(|u| u.node_id)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_types::now_ms;

    #[test]
    fn empty_proof_delta_is_nil() {
        let d = Delta::new(SignalSource::Soft, DeltaKind::Proof(ProofDelta::default()), now_ms());
        assert!(d.is_empty());
    }

    #[test]
    fn terminal_writes_detects_soft_violation_candidates() {
        let d = Delta::new(
            SignalSource::Soft,
            DeltaKind::Proof(ProofDelta {
                updates: vec![ProofUpdate {
                    node_id: NodeId::new(),
                    proof: 0,
                    disproof: 0,
                    status: ProofStatus::Proven,
                }],
            }),
            now_ms(),
        );
        assert_eq!(d.terminal_writes().len(), 1);
    }
}
