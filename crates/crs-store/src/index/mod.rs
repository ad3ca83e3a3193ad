//! Read-only index views over a `Snapshot`.
//!
//! Each view borrows the snapshot's shared state and exposes the minimal
//! query surface its table names — nothing more. Views never mutate; all
//! mutation goes through `CrsStore::apply`.

pub mod analytics;
pub mod constraint;
pub mod dependency;
pub mod history;
pub mod proof;
pub mod similarity;
pub mod streaming;

pub use analytics::AnalyticsIndex;
pub use constraint::ConstraintIndex;
pub use dependency::DependencyIndex;
pub use history::HistoryIndex;
pub use proof::ProofIndex;
pub use similarity::SimilarityIndex;
pub use streaming::StreamingIndex;
