//! Pull request error types.

use crate::github::ApiError;
use thiserror::Error;

/// Errors that can occur while looking up pull requests.
#[derive(Debug, Error)]
pub enum PrError {
    /// GitHub API error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The repository or issue being inspected does not exist.
    #[error("Issue {repository}#{number} was not found")]
    IssueNotFound { repository: String, number: u64 },
}

impl PrError {
    /// Checks if the error indicates permission denied.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Api(e) => e.is_permission_denied(),
            Self::IssueNotFound { .. } => false,
        }
    }
}
