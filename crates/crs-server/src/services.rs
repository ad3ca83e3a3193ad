//! The narrow trait boundary between the reasoning core and everything the
//! core treats as an external collaborator: the LLM/embedding backend, the
//! source parser and file-operation tools. The server depends only on this
//! trait, never on a concrete client, so the core crates stay free of
//! HTTP/LLM concerns.

use async_trait::async_trait;

/// A single step of planning/exploration/reasoning performed by whatever
/// backs this trait (an LLM call, a scripted fixture in tests, …).
#[async_trait]
pub trait ExternalServices: Send + Sync {
    /// Produce a short plan description for `query` against `project_root`.
    async fn plan(&self, project_root: &str, query: &str) -> String;

    /// Return `Some(question)` if the agent should pause for clarification
    /// before reasoning further, else `None`.
    async fn clarification_needed(&self, query: &str) -> Option<String>;

    /// Produce the final natural-language response once reasoning is done.
    async fn respond(&self, query: &str, steps_taken: u32) -> String;
}

/// A deterministic, no-LLM implementation used when no real backend is
/// configured. Never asks for clarification and echoes the query back,
/// which keeps `/agent/run` usable in tests and local smoke checks without
/// wiring up an embedding endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExternalServices;

#[async_trait]
impl ExternalServices for NullExternalServices {
    async fn plan(&self, project_root: &str, query: &str) -> String {
        format!("scan {project_root} for: {query}")
    }

    async fn clarification_needed(&self, _query: &str) -> Option<String> {
        None
    }

    async fn respond(&self, query: &str, steps_taken: u32) -> String {
        format!("processed '{query}' in {steps_taken} steps")
    }
}
