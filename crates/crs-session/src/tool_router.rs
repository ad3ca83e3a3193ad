//! Confidence-gated tool dispatch: a candidate tool is used only if its
//! confidence clears a per-tool threshold; below that, the router falls
//! back to a configured default rather than guessing.

use crate::error::SessionError;
use crs_types::Confidence;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub confidence_threshold: Confidence,
}

#[derive(Debug, Clone)]
pub struct ToolRouter {
    tools: HashMap<&'static str, ToolDescriptor>,
    fallback: Option<&'static str>,
}

impl ToolRouter {
    #[must_use]
    pub fn new(tools: Vec<ToolDescriptor>, fallback: Option<&'static str>) -> Self {
        Self { tools: tools.into_iter().map(|t| (t.name, t)).collect(), fallback }
    }

    /// Validate every registered tool at session creation time, the way a
    /// connection pool primes itself before first use.
    pub fn warmup(&self) {
        for tool in self.tools.values() {
            tracing::debug!(tool = tool.name, threshold = tool.confidence_threshold.value(), "tool router warmup");
        }
    }

    /// Dispatch to `candidate` if its confidence clears the registered
    /// threshold, else fall back (if configured), else reject.
    pub fn dispatch(&self, candidate: &'static str, confidence: Confidence) -> Result<&'static str, SessionError> {
        match self.tools.get(candidate) {
            Some(descriptor) if confidence.value() >= descriptor.confidence_threshold.value() => Ok(candidate),
            Some(_) => match self.fallback {
                Some(fallback) => Ok(fallback),
                None => Err(SessionError::ToolConfidenceBelowThreshold { tool: candidate, confidence: confidence.value() }),
            },
            None => self.fallback.ok_or(SessionError::NoFallbackTool),
        }
    }
}
