//! Discovery of pull requests linked to an issue.
//!
//! The automated fixer opens its pull request some time after it is assigned.
//! GitHub records the link on the issue timeline as a connected or
//! cross-referenced event, which is what this module looks for.

mod error;
mod pull_request;

pub use error::PrError;
pub use pull_request::PullRequest;

use crate::github::{GitHubClient, Transport};
use crate::issues::Issue;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info_span, Instrument};

const LINKED_PR_QUERY: &str = r#"
query LinkedPullRequests($owner: String!, $repo: String!, $number: Int!, $after: String) {
  repository(owner: $owner, name: $repo) {
    issue(number: $number) {
      timelineItems(first: 100, after: $after, itemTypes: [CONNECTED_EVENT, CROSS_REFERENCED_EVENT]) {
        pageInfo { hasNextPage endCursor }
        nodes {
          __typename
          ... on ConnectedEvent {
            subject { __typename ... on PullRequest { id url } }
          }
          ... on CrossReferencedEvent {
            source { __typename ... on PullRequest { id url } }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct LinkedPrData {
    repository: Option<LinkedPrRepository>,
}

#[derive(Debug, Deserialize)]
struct LinkedPrRepository {
    issue: Option<LinkedPrIssue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkedPrIssue {
    timeline_items: TimelineConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineConnection {
    #[serde(default)]
    page_info: Option<PageInfo>,
    #[serde(default)]
    nodes: Vec<Option<TimelineItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum TimelineItem {
    ConnectedEvent { subject: Option<Referenced> },
    CrossReferencedEvent { source: Option<Referenced> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum Referenced {
    PullRequest { id: String, url: String },
    #[serde(other)]
    Other,
}

/// Looks up the first pull request linked to an issue.
///
/// Walks every page of the issue timeline. Read-only and idempotent; safe to
/// call repeatedly while waiting for the fixer to open its pull request.
///
/// # Returns
///
/// `Ok(None)` when no pull request is linked yet.
///
/// # Errors
///
/// Returns [`PrError::IssueNotFound`] if the repository or issue does not
/// exist, or [`PrError::Api`] if the query fails.
pub async fn get_linked_pr<T: Transport>(
    client: &GitHubClient<T>,
    issue: &Issue,
) -> Result<Option<PullRequest>, PrError> {
    let span = info_span!("get_linked_pr", repo = %issue.slug(), issue_number = issue.number());

    walk_timeline(client, issue).instrument(span).await
}

async fn walk_timeline<T: Transport>(
    client: &GitHubClient<T>,
    issue: &Issue,
) -> Result<Option<PullRequest>, PrError> {
    let mut after: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let data: LinkedPrData = client
            .graphql(
                "linked pull requests",
                LINKED_PR_QUERY,
                json!({
                    "owner": issue.owner(),
                    "repo": issue.repository(),
                    "number": issue.number(),
                    "after": after,
                }),
            )
            .await?;
        pages += 1;

        let timeline = data
            .repository
            .and_then(|repository| repository.issue)
            .ok_or_else(|| PrError::IssueNotFound {
                repository: issue.slug().to_string(),
                number: issue.number(),
            })?
            .timeline_items;

        if let Some(pull_request) = first_pull_request(timeline.nodes.into_iter().flatten()) {
            debug!(pages, "Found linked pull request on issue timeline");
            return Ok(Some(pull_request));
        }

        // Events come oldest first; a missing cursor ends the walk.
        match timeline.page_info {
            Some(PageInfo {
                has_next_page: true,
                end_cursor: Some(cursor),
            }) => after = Some(cursor),
            _ => {
                debug!(pages, "No pull request on issue timeline");
                return Ok(None);
            }
        }
    }
}

/// Returns the first pull request referenced by the timeline, in event order.
fn first_pull_request(items: impl IntoIterator<Item = TimelineItem>) -> Option<PullRequest> {
    items.into_iter().find_map(|item| {
        let referenced = match item {
            TimelineItem::ConnectedEvent { subject } => subject,
            TimelineItem::CrossReferencedEvent { source } => source,
            TimelineItem::Other => None,
        };
        match referenced? {
            Referenced::PullRequest { id, url } => Some(PullRequest { url, node_id: id }),
            Referenced::Other => None,
        }
    })
}
