//! Fixtures and builders shared by `crs-*` crate test suites.
//!
//! Kept in its own crate so integration tests across `crs-store`,
//! `crs-session` and `crs-server` don't each hand-roll the same store/session
//! scaffolding.

#![allow(missing_docs)]

use crs_session::{Budget, Session, SessionConfig};
use crs_store::types::{Constraint, ConstraintKind, DependencyEdge};
use crs_store::{
    ConstraintDelta, CrsConfig, CrsStore, Delta, DeltaKind, DependencyDelta, HistoryDelta, ProofDelta,
    ProofUpdate,
};
use crs_types::{now_ms, ConstraintId, NodeId, ProofStatus, SignalSource};
use std::sync::Arc;

/// A store with default config, ready to accept deltas.
#[must_use]
pub fn empty_store() -> CrsStore {
    CrsStore::new(CrsConfig::default())
}

/// A store with `strict` validation turned on, rejecting constraints over
/// nodes that have never had a proof entry.
#[must_use]
pub fn strict_store() -> CrsStore {
    CrsStore::new(CrsConfig { strict: true, ..CrsConfig::default() })
}

/// A `Hard`-sourced delta moving `node` to a non-terminal proof number.
#[must_use]
pub fn proof_delta(node: NodeId, proof: u64, disproof: u64, source: SignalSource) -> Delta {
    Delta::new(
        source,
        DeltaKind::Proof(ProofDelta {
            updates: vec![ProofUpdate { node_id: node, proof, disproof, status: ProofStatus::Unknown }],
        }),
        now_ms(),
    )
}

/// A `Hard`-sourced delta resolving `node` to `status`. `status` must be
/// terminal; callers exercising the soft-signal rejection path should build
/// the delta by hand with `SignalSource::Soft` instead.
#[must_use]
pub fn terminal_proof_delta(node: NodeId, status: ProofStatus) -> Delta {
    Delta::new(
        SignalSource::Hard,
        DeltaKind::Proof(ProofDelta {
            updates: vec![ProofUpdate { node_id: node, proof: 0, disproof: 0, status }],
        }),
        now_ms(),
    )
}

/// A delta adding a single mutual-exclusion constraint over `nodes`.
#[must_use]
pub fn constraint_delta(nodes: Vec<NodeId>) -> Delta {
    Delta::new(
        SignalSource::Hard,
        DeltaKind::Constraint(ConstraintDelta {
            added: vec![Constraint { id: ConstraintId::new(), kind: ConstraintKind::MutualExclusion, nodes }],
        }),
        now_ms(),
    )
}

/// A delta adding a single dependency edge `from -> to`.
#[must_use]
pub fn dependency_delta(from: NodeId, to: NodeId) -> Delta {
    Delta::new(
        SignalSource::Hard,
        DeltaKind::Dependency(DependencyDelta { added_edges: vec![DependencyEdge { from, to }] }),
        now_ms(),
    )
}

/// A delta recording a single history visit.
#[must_use]
pub fn history_delta(node: NodeId) -> Delta {
    Delta::new(SignalSource::Hard, DeltaKind::History(HistoryDelta { visited: vec![node] }), now_ms())
}

/// A fresh session over a fresh store, with a generous default budget.
#[must_use]
pub fn fresh_session() -> Session {
    Session::new(Arc::new(empty_store()), SessionConfig::default())
}

/// A session whose budget is exhausted after a single step, for exercising
/// forced-`Respond` behavior without looping `advance` dozens of times.
#[must_use]
pub fn tight_budget_session() -> Session {
    let budget = Budget { max_steps: 1, ..Budget::default() };
    Session::new(Arc::new(empty_store()), SessionConfig { budget })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crs_session::SessionPhase;

    #[test]
    fn empty_store_accepts_a_proof_delta() {
        let store = empty_store();
        let node = NodeId::new();
        let gen = store.apply(proof_delta(node, 3, 2, SignalSource::Hard)).unwrap();
        assert_eq!(gen, crs_types::Generation::ZERO.next());
    }

    #[test]
    fn strict_store_rejects_constraint_over_unknown_node() {
        let store = strict_store();
        assert!(store.apply(constraint_delta(vec![NodeId::new()])).is_err());
    }

    #[test]
    fn tight_budget_forces_respond_on_second_advance() {
        let mut session = tight_budget_session();
        session.advance(SessionPhase::Plan, "planning").unwrap();
        assert!(session.advance(SessionPhase::Explore, "exploring").is_err());
        assert_eq!(session.phase(), SessionPhase::Respond);
    }
}
