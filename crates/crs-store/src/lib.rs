//! Code Reasoning State (CRS): an immutable-snapshot, delta-journaled
//! multi-index store with generation numbering.

pub mod delta;
pub mod error;
pub mod index;
pub mod resource;
mod snapshot;
mod state;
pub mod store;
pub mod types;

pub use delta::{
    AnalyticsDelta, ConstraintDelta, Delta, DeltaKind, DependencyDelta, HistoryDelta, ProofDelta,
    ProofUpdate, SimilarityDelta, StreamingDelta,
};
pub use error::{DeltaValidationError, StoreError};
pub use snapshot::Snapshot;
pub use store::{stamp_now, CrsConfig, CrsStore};
