//! Runner error types.

use crate::issues::IssueError;
use crate::pull_requests::PrError;

/// Errors that can occur while running the fixer.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Issue template could not be compiled.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Input handed over by the harness is not the expected JSON.
    #[error("Malformed {input} input: {source}")]
    MalformedInput {
        input: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Results could not be encoded for the harness.
    #[error("Failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),

    /// Results could not be written for the harness.
    #[error(transparent)]
    Output(#[from] crate::output::OutputError),

    /// A required value was empty.
    #[error("Missing required value: {name}")]
    MissingValue { name: &'static str },

    /// The target repository slug is malformed.
    #[error("Invalid repository '{slug}': {source}")]
    InvalidRepository {
        slug: String,
        #[source]
        source: IssueError,
    },

    /// An input issue could not be normalized.
    #[error("Invalid issue '{url}': {source}")]
    Input {
        url: String,
        #[source]
        source: IssueError,
    },

    /// The fixer could not be assigned.
    #[error("Failed to assign {repository}#{number} to {fixer}: {source}")]
    Assignment {
        repository: String,
        number: u64,
        fixer: String,
        #[source]
        source: IssueError,
    },

    /// Looking for the linked pull request failed.
    #[error("Failed to look up the pull request linked to {repository}#{number}: {source}")]
    Discovery {
        repository: String,
        number: u64,
        #[source]
        source: PrError,
    },

    /// An issue could not be filed for a finding.
    #[error("Failed to file '{rule_id}' finding on {url} in {repository}: {source}")]
    Filing {
        repository: String,
        rule_id: String,
        url: String,
        #[source]
        source: IssueError,
    },
}

impl RunnerError {
    /// Returns true for errors raised before any work was attempted.
    #[must_use]
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Octocrab(_)
                | Self::Template(_)
                | Self::MalformedInput { .. }
                | Self::MissingValue { .. }
                | Self::InvalidRepository { .. }
        )
    }
}
