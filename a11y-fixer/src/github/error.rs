//! GitHub API error types.

use crate::rate_limit::RateLimitKind;
use thiserror::Error;

/// Errors that can occur while talking to the GitHub API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client failed before a response was received.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The request stayed throttled after the automatic retries ran out.
    #[error("{request} was rate limited ({kind}) after {retries} retries: {message}")]
    RateLimited {
        request: String,
        kind: RateLimitKind,
        retries: u32,
        message: String,
    },

    /// The API answered with a non-success status.
    #[error("{request} failed with HTTP {status}: {message}")]
    Status {
        request: String,
        status: u16,
        message: String,
    },

    /// The GraphQL endpoint reported errors in the response body.
    #[error("{request} returned GraphQL errors: {}", messages.join("; "))]
    GraphQl {
        request: String,
        messages: Vec<String>,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to decode response for {request}: {source}")]
    Decode {
        request: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Returns true if the error means the target does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 404,
            Self::GraphQl { messages, .. } => messages
                .iter()
                .any(|m| m.to_lowercase().contains("could not resolve")),
            _ => false,
        }
    }

    /// Returns true if the error means the token lacks access.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Status { status, .. } => matches!(status, 401 | 403),
            Self::GraphQl { messages, .. } => messages.iter().any(|m| {
                let m = m.to_lowercase();
                m.contains("forbidden") || m.contains("permission")
            }),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_not_found() {
        let status = ApiError::Status {
            request: "create issue".to_string(),
            status: 404,
            message: "Not Found".to_string(),
        };
        let graphql = ApiError::GraphQl {
            request: "linked pull requests".to_string(),
            messages: vec!["Could not resolve to an Issue with the number of 42.".to_string()],
        };

        assert!(status.is_not_found());
        assert!(graphql.is_not_found());
        assert!(!status.is_permission_denied());
    }

    #[test]
    fn classifies_permission_denied() {
        let error = ApiError::Status {
            request: "assign fixer".to_string(),
            status: 403,
            message: "Resource not accessible by integration".to_string(),
        };

        assert!(error.is_permission_denied());
        assert!(!error.is_not_found());
    }
}
