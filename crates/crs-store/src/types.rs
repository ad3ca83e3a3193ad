//! Domain types for the facts held inside the Code Reasoning State.
//!
//! Identifiers and the signal taxonomy live in `crs-types`; this module holds
//! the record shapes specific to the store itself.

use crs_types::{Confidence, NodeId, ProofStatus, SignalSource, TimestampMs};
use serde::{Deserialize, Serialize};

/// Proof/disproof counters driving proof-number search.
///
/// `proof >= 1` and `disproof >= 1` for any non-terminal node; the store
/// enforces this at construction rather than trusting callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNumber {
    pub proof: u64,
    pub disproof: u64,
    pub status: ProofStatus,
    pub source: SignalSource,
    pub updated_at: TimestampMs,
}

impl ProofNumber {
    /// Construct a non-terminal proof number, clamping `proof`/`disproof` to
    /// their minimum legal value of 1.
    #[must_use]
    pub fn new(proof: u64, disproof: u64, source: SignalSource, updated_at: TimestampMs) -> Self {
        Self {
            proof: proof.max(1),
            disproof: disproof.max(1),
            status: ProofStatus::Unknown,
            source,
            updated_at,
        }
    }

    #[must_use]
    pub fn terminal(status: ProofStatus, source: SignalSource, updated_at: TimestampMs) -> Self {
        debug_assert!(status.is_terminal());
        Self {
            proof: if status == ProofStatus::Proven { 0 } else { u64::MAX },
            disproof: if status == ProofStatus::Disproven { 0 } else { u64::MAX },
            status,
            source,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    MutualExclusion,
    Implication,
    Ordering,
}

/// A constraint over an ordered list of nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub id: crs_types::ConstraintId,
    pub kind: ConstraintKind,
    pub nodes: Vec<NodeId>,
}

impl Constraint {
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

/// A directed edge in the code graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: NodeId,
    pub to: NodeId,
}

/// Two nodes judged similar by a soft algorithm, with a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    pub a: NodeId,
    pub b: NodeId,
    pub score: Confidence,
}

/// A single visit of a node, used by the History index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub node_id: NodeId,
    pub visited_at: TimestampMs,
}

/// A cardinality estimate produced by a streaming sketch algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamingRecord {
    pub cardinality: f64,
    pub approximate_bytes: usize,
}

/// Summary of one algorithm run, kept for the Analytics index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub query_type: String,
    pub result_summary: String,
    pub recorded_at: TimestampMs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_types::now_ms;

    #[test]
    fn proof_number_enforces_minimum_of_one() {
        let pn = ProofNumber::new(0, 0, SignalSource::Soft, now_ms());
        assert_eq!(pn.proof, 1);
        assert_eq!(pn.disproof, 1);
    }

    #[test]
    fn terminal_proven_has_zero_proof() {
        let pn = ProofNumber::terminal(ProofStatus::Proven, SignalSource::Hard, now_ms());
        assert_eq!(pn.proof, 0);
        assert!(pn.status.is_terminal());
    }
}
