//! Pull request reference type.

use serde::{Deserialize, Serialize};

/// A pull request linked to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    /// Pull request URL.
    pub url: String,

    /// GraphQL node id.
    pub node_id: String,
}
