//! Issue lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a GitHub issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Issue is open.
    Open,

    /// Issue was closed and opened again.
    Reopened,

    /// Issue is closed.
    Closed,
}

impl IssueState {
    /// Returns the state as GitHub spells it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Reopened => "reopened",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_github_spelling() {
        assert_eq!(
            serde_json::to_string(&IssueState::Reopened).unwrap(),
            "\"reopened\""
        );
        assert_eq!(
            serde_json::from_str::<IssueState>("\"closed\"").unwrap(),
            IssueState::Closed
        );
        assert_eq!(IssueState::Open.to_string(), "open");
    }
}
