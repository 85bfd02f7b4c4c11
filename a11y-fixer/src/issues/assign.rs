//! Assigning issues to the automated fixer.

use super::{Issue, IssueError, RepoSlug};
use crate::github::{GitHubClient, Transport};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, info_span, Instrument};

/// Default login of the automated fixer (the Copilot coding agent).
pub const DEFAULT_FIXER_LOGIN: &str = "copilot-swe-agent";

const SUGGESTED_ACTORS_QUERY: &str = r#"
query SuggestedActors($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    suggestedActors(capabilities: [CAN_BE_ASSIGNED], first: 100) {
      nodes {
        login
        ... on Bot { id }
        ... on User { id }
      }
    }
  }
}
"#;

const REPLACE_ACTORS_MUTATION: &str = r#"
mutation AssignFixer($assignableId: ID!, $actorIds: [ID!]!) {
  replaceActorsForAssignable(input: { assignableId: $assignableId, actorIds: $actorIds }) {
    __typename
  }
}
"#;

#[derive(Debug, Deserialize)]
struct SuggestedActorsData {
    repository: Option<SuggestedActorsRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestedActorsRepository {
    suggested_actors: ActorConnection,
}

#[derive(Debug, Deserialize)]
struct ActorConnection {
    #[serde(default)]
    nodes: Vec<Option<Actor>>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    login: String,
    id: Option<String>,
}

/// Attaches the automated fixer to an issue.
///
/// This function:
/// 1. Looks up the fixer among the repository's assignable actors
/// 2. Sends a single mutation assigning it to the issue
///
/// The operation is not retried beyond transport-level rate limit handling.
///
/// # Arguments
///
/// * `client` - Throttled GitHub client
/// * `issue` - Issue to assign
/// * `fixer_login` - Login of the fixer account
///
/// # Errors
///
/// Returns [`IssueError::FixerUnavailable`] if the fixer cannot be assigned in
/// the repository, or [`IssueError::Api`] if either request fails.
pub async fn assign_issue<T: Transport>(
    client: &GitHubClient<T>,
    issue: &Issue,
    fixer_login: &str,
) -> Result<(), IssueError> {
    let span = info_span!(
        "assign_issue",
        repo = %issue.slug(),
        issue_number = issue.number(),
        fixer = %fixer_login
    );

    async {
        info!("Assigning issue to fixer");

        let actor_id = find_fixer(client, issue.slug(), fixer_login).await?;
        debug!(actor_id = %actor_id, "Resolved fixer actor");

        let _: Value = client
            .graphql(
                "assign fixer",
                REPLACE_ACTORS_MUTATION,
                json!({
                    "assignableId": issue.node_id(),
                    "actorIds": [actor_id],
                }),
            )
            .await?;

        info!("Fixer assigned");
        Ok(())
    }
    .instrument(span)
    .await
}

/// Finds the node id of the fixer among the assignable actors.
async fn find_fixer<T: Transport>(
    client: &GitHubClient<T>,
    slug: &RepoSlug,
    fixer_login: &str,
) -> Result<String, IssueError> {
    let data: SuggestedActorsData = client
        .graphql(
            "suggested actors",
            SUGGESTED_ACTORS_QUERY,
            json!({ "owner": slug.owner(), "repo": slug.name() }),
        )
        .await?;

    data.repository
        .into_iter()
        .flat_map(|repository| repository.suggested_actors.nodes)
        .flatten()
        .find(|actor| actor.login.eq_ignore_ascii_case(fixer_login))
        .and_then(|actor| actor.id)
        .ok_or_else(|| IssueError::FixerUnavailable {
            login: fixer_login.to_string(),
            repository: slug.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::{client, secondary_limited};
    use crate::github::{ApiError, RawResponse};
    use crate::issues::IssueRef;

    fn issue() -> Issue {
        Issue::from_ref(&IssueRef {
            id: 1,
            node_id: "I_node42".to_string(),
            url: "https://github.com/acme/site/issues/42".to_string(),
            title: String::new(),
            state: None,
            repository: None,
            number: None,
        })
        .unwrap()
    }

    fn actors(logins: &[(&str, &str)]) -> RawResponse {
        let nodes: Vec<Value> = logins
            .iter()
            .map(|(login, id)| json!({ "login": login, "id": id }))
            .collect();
        RawResponse::new(
            200,
            json!({ "data": { "repository": { "suggestedActors": { "nodes": nodes } } } })
                .to_string(),
        )
    }

    #[tokio::test]
    async fn assigns_fixer_by_node_id() {
        let client = client([
            actors(&[("octocat", "U_1"), ("copilot-swe-agent", "BOT_9")]),
            RawResponse::new(
                200,
                r#"{"data":{"replaceActorsForAssignable":{"__typename":"ReplaceActorsForAssignablePayload"}}}"#,
            ),
        ]);

        assign_issue(&client, &issue(), DEFAULT_FIXER_LOGIN)
            .await
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].1["variables"]["owner"], "acme");
        assert_eq!(requests[1].1["variables"]["assignableId"], "I_node42");
        assert_eq!(requests[1].1["variables"]["actorIds"], json!(["BOT_9"]));
    }

    #[tokio::test]
    async fn unavailable_fixer_is_an_error() {
        let client = client([actors(&[("octocat", "U_1")])]);

        let result = assign_issue(&client, &issue(), DEFAULT_FIXER_LOGIN).await;

        assert!(matches!(result, Err(IssueError::FixerUnavailable { .. })));
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn mutation_errors_propagate() {
        let client = client([
            actors(&[("copilot-swe-agent", "BOT_9")]),
            RawResponse::new(
                200,
                r#"{"data":null,"errors":[{"type":"NOT_FOUND","message":"Could not resolve to a node with the global id of 'I_node42'"}]}"#,
            ),
        ]);

        let result = assign_issue(&client, &issue(), DEFAULT_FIXER_LOGIN).await;

        assert!(matches!(result, Err(IssueError::Api(ref e)) if e.is_not_found()));
    }

    #[tokio::test]
    async fn throttled_lookup_is_retried() {
        let client = client([
            secondary_limited(),
            actors(&[("copilot-swe-agent", "BOT_9")]),
            RawResponse::new(200, r#"{"data":{"replaceActorsForAssignable":{"__typename":"X"}}}"#),
        ]);

        assign_issue(&client, &issue(), DEFAULT_FIXER_LOGIN)
            .await
            .unwrap();

        assert_eq!(client.transport().requests().len(), 3);
    }

    #[tokio::test]
    async fn forbidden_mutation_is_permission_denied() {
        let client = client([
            actors(&[("copilot-swe-agent", "BOT_9")]),
            RawResponse::new(403, r#"{"message":"Resource not accessible by integration"}"#),
        ]);

        let result = assign_issue(&client, &issue(), DEFAULT_FIXER_LOGIN).await;

        let error = result.unwrap_err();
        assert!(error.is_permission_denied());
        assert!(matches!(error, IssueError::Api(ApiError::Status { status: 403, .. })));
    }
}
