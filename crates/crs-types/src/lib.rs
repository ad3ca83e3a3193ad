//! Shared identifiers and taxonomy types for the Code Reasoning State.
//!
//! Kept in its own crate because `crs-store`, `crs-algorithms` and
//! `crs-session` all need to name the same node/session identifiers and the
//! same signal taxonomy without depending on each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Unix milliseconds, UTC. Never a local-time value.
pub type TimestampMs = u64;

/// Current time as Unix milliseconds. The only place wall-clock time is read.
#[must_use]
pub fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(NodeId);
uuid_id!(SessionId);
uuid_id!(ConstraintId);
uuid_id!(EventId);

/// Monotonic generation counter stamped on every `CrsStore` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub const ZERO: Generation = Generation(0);

    #[must_use]
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Provenance tag carried by every delta and every fact it writes.
///
/// `Hard` sources are deterministic (parser, test execution, constraint
/// evaluation); `Soft` sources are heuristic (LLM, similarity, proof-number
/// search); `Unknown` is neither claimed nor trusted for terminal facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalSource {
    Hard,
    Soft,
    Unknown,
}

impl SignalSource {
    /// Only `Hard` sources may write a terminal proof status.
    #[must_use]
    pub fn may_write_terminal(self) -> bool {
        matches!(self, SignalSource::Hard)
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Status of a proof-number search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofStatus {
    Unknown,
    Expanded,
    Proven,
    Disproven,
}

impl ProofStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ProofStatus::Proven | ProofStatus::Disproven)
    }
}

/// A confidence value clamped to `[0, 1]` at construction time, so the
/// "confidence range" invariant cannot be violated by construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
