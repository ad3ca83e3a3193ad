//! Typed registry and runtime contract for pluggable reasoning algorithms.
//!
//! Every algorithm is stateless with respect to the Code Reasoning State: it
//! reads a [`crs_store::Snapshot`] and returns an output plus an optional
//! delta for the store to apply. The four families — planning, search,
//! graph, streaming — share one [`contract::Algorithm`] trait but differ in
//! their associated input/output types, so dispatch by name goes through
//! [`registry::AlgorithmRegistry`] rather than a trait-object table.

pub mod contract;
pub mod error;
pub mod graph;
pub mod planning;
pub mod property_checker;
pub mod registry;
pub mod search;
pub mod streaming;

pub use contract::{Algorithm, AlgorithmContext, Evaluable, MetricDefinition, MetricKind, Property};
pub use error::AlgorithmError;
pub use property_checker::{PropertyChecker, PropertyViolation};
pub use registry::{AlgorithmDescriptor, AlgorithmFamily, AlgorithmRegistry};
