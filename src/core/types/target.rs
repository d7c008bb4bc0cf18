//! Token selection

use super::ProcessId;
use std::fmt;

/// Which access token a query addresses
///
/// A plain value: backends open and close the underlying handle per call,
/// so holding a `TokenTarget` never keeps a token alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenTarget {
    /// Primary token of the calling process
    #[default]
    CurrentProcess,
    /// Primary token of another process
    Process(ProcessId),
}

impl TokenTarget {
    /// Resolve an optional target, defaulting to the current process
    pub fn or_current(target: Option<TokenTarget>) -> TokenTarget {
        target.unwrap_or_default()
    }
}

impl fmt::Display for TokenTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenTarget::CurrentProcess => write!(f, "current process"),
            TokenTarget::Process(pid) => write!(f, "process {}", pid),
        }
    }
}
