use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Execution context of the running extension page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// Privileged background page, the only context running real services
    Background,
    /// Content script injected into a social network page
    Content,
    /// Options page / dashboard
    Options,
    /// Standalone UI development harness
    Debugging,
    #[default]
    Unknown,
}

impl ExecutionContext {
    pub fn is_privileged(&self) -> bool {
        matches!(self, ExecutionContext::Background)
    }

    /// Contexts that reach services through a proxy
    pub fn is_ui(&self) -> bool {
        matches!(
            self,
            ExecutionContext::Content | ExecutionContext::Options | ExecutionContext::Debugging
        )
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionContext::Background => write!(f, "background"),
            ExecutionContext::Content => write!(f, "content"),
            ExecutionContext::Options => write!(f, "options"),
            ExecutionContext::Debugging => write!(f, "debugging"),
            ExecutionContext::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for ExecutionContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "background" => Ok(ExecutionContext::Background),
            "content" | "content-script" => Ok(ExecutionContext::Content),
            "options" | "options-page" => Ok(ExecutionContext::Options),
            "debugging" => Ok(ExecutionContext::Debugging),
            "unknown" => Ok(ExecutionContext::Unknown),
            _ => Err(format!("Unknown execution context: {}", s)),
        }
    }
}

/// Answers which context the current process runs in
pub trait ContextDetector: Send + Sync {
    fn current(&self) -> ExecutionContext;
}

/// Detector pinned to a single context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticContext(pub ExecutionContext);

impl ContextDetector for StaticContext {
    fn current(&self) -> ExecutionContext {
        self.0
    }
}
