//! The session layer: a phase state machine, step/token/wall-clock budgets,
//! confidence-gated tool routing and an append-only reasoning trace, wired
//! together around a shared Code Reasoning State store.
//!
//! A `Session` owns one agent's run end to end; a `SessionRegistry` is the
//! table a server surface uses to look one up by id across requests.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod budget;
pub mod error;
pub mod registry;
pub mod session;
pub mod state_machine;
pub mod tool_router;
pub mod trace;

pub use budget::{Budget, BudgetUsage};
pub use error::SessionError;
pub use registry::{SessionHandle, SessionRegistry};
pub use session::{Session, SessionConfig};
pub use state_machine::{SessionPhase, StateMachine};
pub use tool_router::{ToolDescriptor, ToolRouter};
pub use trace::{ReasoningStep, ReasoningTrace};
