//! The Algorithm contract.
//!
//! Every reasoning algorithm — planner, search procedure, graph routine, or
//! streaming sketch — implements [`Algorithm`]. The runtime checks
//! `input_type()`/`output_type()` against what the caller is asking for and
//! rejects a mismatch with `InvalidInput` before `process` ever runs, the
//! same dynamic-dispatch-by-descriptor technique is used for its
//! capability traits.

use crate::error::AlgorithmError;
use crs_store::{Delta, Snapshot};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A named, language-neutral predicate an algorithm claims to uphold.
/// Consumed by tests and by the property-checker.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: &'static str,
    pub description: &'static str,
}

impl Property {
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub kind: MetricKind,
    /// Only meaningful for `Histogram`.
    pub buckets: Option<Vec<f64>>,
}

impl MetricDefinition {
    #[must_use]
    pub const fn counter(name: &'static str) -> Self {
        Self { name, kind: MetricKind::Counter, buckets: None }
    }

    #[must_use]
    pub const fn gauge(name: &'static str) -> Self {
        Self { name, kind: MetricKind::Gauge, buckets: None }
    }

    #[must_use]
    pub fn histogram(name: &'static str, buckets: Vec<f64>) -> Self {
        Self { name, kind: MetricKind::Histogram, buckets: Some(buckets) }
    }
}

/// Cancellation + deadline handed to every `process` call.
#[derive(Clone)]
pub struct AlgorithmContext {
    pub cancellation: CancellationToken,
    pub deadline: Option<std::time::Instant>,
}

impl AlgorithmContext {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            cancellation: CancellationToken::new(),
            deadline: Some(std::time::Instant::now() + timeout),
        }
    }

    #[must_use]
    pub fn unbounded() -> Self {
        Self { cancellation: CancellationToken::new(), deadline: None }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
            || self.deadline.is_some_and(|d| std::time::Instant::now() >= d)
    }
}

/// Health/metadata surface every algorithm exposes.
pub trait Evaluable {
    fn name(&self) -> &'static str;
    fn input_type(&self) -> &'static str;
    fn output_type(&self) -> &'static str;
    fn timeout(&self) -> Duration;
    fn progress_interval(&self) -> Duration {
        Duration::from_millis(250)
    }
    fn supports_partial_results(&self) -> bool {
        false
    }
    fn properties(&self) -> Vec<Property> {
        Vec::new()
    }
    fn metrics(&self) -> Vec<MetricDefinition> {
        Vec::new()
    }
    fn health_check(&self) -> Result<(), AlgorithmError> {
        Ok(())
    }
}

/// `Process(ctx, snapshot, input) -> (output, delta?, error)`.
///
/// Algorithms are stateless with respect to the CRS: they read a snapshot
/// and propose a delta rather than mutating anything themselves.
pub trait Algorithm: Evaluable + Send + Sync {
    type Input: Send;
    type Output: Send;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<Delta>), AlgorithmError>;
}

/// Shared default-method helpers so concrete algorithms only implement what
/// differs, mirroring the way a scheduler might factor default scheduler/executor
/// behavior out of `BasicScheduler`.
pub mod defaults {
    use std::time::Duration;

    #[must_use]
    pub const fn default_timeout() -> Duration {
        Duration::from_secs(5)
    }
}
