//! GitHub issue representation, creation and assignment.
//!
//! Issues arrive from the workflow harness as [`IssueRef`] values and are
//! normalized into [`Issue`] before any network call is made. New issues are
//! filed from accessibility [`Finding`]s.

mod assign;
mod error;
mod finding;
mod issue;
mod new_issue;
mod status;

pub use assign::{assign_issue, DEFAULT_FIXER_LOGIN};
pub use error::IssueError;
pub use finding::Finding;
pub use issue::{Issue, IssueRef, RepoSlug};
pub use new_issue::NewIssue;
pub use status::IssueState;

use crate::github::{GitHubClient, Transport};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, info_span, Instrument};

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    id: u64,
    node_id: String,
    html_url: String,
    number: u64,
    title: String,
    state: IssueState,
}

/// Creates an issue in a repository.
///
/// # Arguments
///
/// * `client` - Throttled GitHub client
/// * `slug` - Target repository
/// * `issue` - Title, body and labels of the new issue
///
/// # Returns
///
/// An [`IssueRef`] describing the created issue, with repository and number
/// filled in.
///
/// # Errors
///
/// Returns [`IssueError::Api`] if the request fails.
pub async fn create_issue<T: Transport>(
    client: &GitHubClient<T>,
    slug: &RepoSlug,
    issue: &NewIssue,
) -> Result<IssueRef, IssueError> {
    let span = info_span!("create_issue", repo = %slug, title = %issue.title);

    async {
        info!("Creating issue");

        let route = format!("/repos/{}/{}/issues", slug.owner(), slug.name());
        let payload = json!({
            "title": issue.title,
            "body": issue.body,
            "labels": issue.labels,
        });
        let created: CreatedIssue = client.rest("create issue", &route, &payload).await?;

        info!(issue_number = created.number, "Issue created successfully");
        Ok(IssueRef {
            id: created.id,
            node_id: created.node_id,
            url: created.html_url,
            title: created.title,
            state: Some(created.state),
            repository: Some(slug.to_string()),
            number: Some(created.number),
        })
    }
    .instrument(span)
    .await
}
