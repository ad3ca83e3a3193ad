//! Error taxonomy for the CRS store.

use thiserror::Error;

/// A delta was rejected because it would violate a store invariant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeltaValidationError {
    #[error("soft-signal safety violated: delta attempted to write terminal status for node {0}")]
    SoftSignalTerminalWrite(crs_types::NodeId),
    #[error("constraint {0} references a node unknown to the current generation")]
    UnknownNode(crs_types::NodeId),
    #[error("dependency edge from {from} to {to} would be a self-loop")]
    SelfLoop { from: crs_types::NodeId, to: crs_types::NodeId },
    #[error("history cap must be nonzero")]
    ZeroCap,
}

/// Errors returned by `CrsStore::apply`.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The delta was empty / carried no mutation.
    #[error("nil delta")]
    NilDelta,

    /// The delta failed validation; non-fatal, caller may retry or drop it.
    #[error("delta validation failed: {0}")]
    DeltaValidation(#[from] DeltaValidationError),

    /// The requested node/constraint/etc. does not exist in the snapshot.
    #[error("not found")]
    NotFound,
}

impl StoreError {
    /// Validation failures are reported to the caller; the store itself is
    /// never corrupted by a rejected delta. Mirrors the recoverability
    /// classifier pattern used throughout the reasoning substrate.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, StoreError::NotFound)
    }
}
