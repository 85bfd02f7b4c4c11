//! Issue error types.

use crate::github::ApiError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur during issue operations.
#[derive(Debug, Error)]
pub enum IssueError {
    /// Repository slug is not in `owner/name` form.
    #[error("Malformed repository slug '{slug}': expected 'owner/name'")]
    MalformedSlug { slug: String },

    /// Issue number could not be determined from the reference.
    #[error("Cannot determine the issue number of '{url}'")]
    InvalidIssueUrl { url: String },

    /// GitHub API error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The fixer is not among the repository's assignable actors.
    #[error("'{login}' cannot be assigned to issues in {repository}")]
    FixerUnavailable { login: String, repository: String },

    /// Template rendering error.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl IssueError {
    /// Returns true for errors caused by bad input rather than by GitHub.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedSlug { .. } | Self::InvalidIssueUrl { .. } | Self::Template(_)
        )
    }

    /// Checks if the error indicates permission denied.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Api(e) => e.is_permission_denied(),
            _ => false,
        }
    }
}
