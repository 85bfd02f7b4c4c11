//! Issue references and their normalized form.

use super::{IssueError, IssueState};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A repository identified by `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    /// Splits an `owner/name` slug.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::MalformedSlug`] when the slug has no `/`, an empty
    /// part, or more than two segments.
    pub fn parse(slug: &str) -> Result<Self, IssueError> {
        let malformed = || IssueError::MalformedSlug {
            slug: slug.to_string(),
        };

        let (owner, name) = slug.trim().split_once('/').ok_or_else(malformed)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(malformed());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// An issue as exchanged with the workflow harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRef {
    /// Numeric issue id.
    pub id: u64,

    /// GraphQL node id.
    pub node_id: String,

    /// Issue URL (`https://github.com/{owner}/{repo}/issues/{number}`).
    pub url: String,

    /// Issue title.
    #[serde(default)]
    pub title: String,

    /// Lifecycle state, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,

    /// Repository slug; derived from `url` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Issue number; derived from `url` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

/// Normalized, read-only view of an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    id: u64,
    node_id: String,
    slug: RepoSlug,
    number: u64,
    url: String,
    state: Option<IssueState>,
}

impl Issue {
    /// Normalizes an [`IssueRef`] without any network access.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::MalformedSlug`] or [`IssueError::InvalidIssueUrl`]
    /// when the reference does not identify a repository and issue number.
    pub fn from_ref(issue: &IssueRef) -> Result<Self, IssueError> {
        let segments = url_segments(&issue.url);

        let slug = match issue.repository.as_deref() {
            Some(slug) => RepoSlug::parse(slug)?,
            None => match segments.as_slice() {
                [owner, name, ..] => RepoSlug::parse(&format!("{owner}/{name}"))?,
                _ => {
                    return Err(IssueError::InvalidIssueUrl {
                        url: issue.url.clone(),
                    })
                }
            },
        };

        let number = issue
            .number
            .or_else(|| match segments.as_slice() {
                [_, _, kind, number, ..] if kind == "issues" => number.parse().ok(),
                _ => None,
            })
            .ok_or_else(|| IssueError::InvalidIssueUrl {
                url: issue.url.clone(),
            })?;

        Ok(Self {
            id: issue.id,
            node_id: issue.node_id.clone(),
            slug,
            number,
            url: issue.url.clone(),
            state: issue.state,
        })
    }

    /// Numeric issue id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// GraphQL node id.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Owning repository.
    pub fn slug(&self) -> &RepoSlug {
        &self.slug
    }

    /// Repository owner.
    pub fn owner(&self) -> &str {
        self.slug.owner()
    }

    /// Repository name.
    pub fn repository(&self) -> &str {
        self.slug.name()
    }

    /// Issue number.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Issue URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Lifecycle state, when known.
    pub fn state(&self) -> Option<IssueState> {
        self.state
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.slug, self.number)
    }
}

fn url_segments(url: &str) -> Vec<String> {
    Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .map(|s| s.filter(|s| !s.is_empty()).map(str::to_string).collect())
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_ref(url: &str) -> IssueRef {
        IssueRef {
            id: 7,
            node_id: "I_kwDO".to_string(),
            url: url.to_string(),
            title: "Accessibility issue".to_string(),
            state: Some(IssueState::Open),
            repository: None,
            number: None,
        }
    }

    #[test]
    fn parses_slug() {
        let slug = RepoSlug::parse("acme/site").unwrap();

        assert_eq!(slug.owner(), "acme");
        assert_eq!(slug.name(), "site");
        assert_eq!(slug.to_string(), "acme/site");
    }

    #[test]
    fn rejects_malformed_slugs() {
        for slug in ["acme", "/site", "acme/", "acme/site/extra", ""] {
            assert!(
                matches!(RepoSlug::parse(slug), Err(IssueError::MalformedSlug { .. })),
                "{slug} should be rejected"
            );
        }
    }

    #[test]
    fn normalizes_from_url() {
        let issue = Issue::from_ref(&issue_ref("https://github.com/acme/site/issues/42")).unwrap();

        assert_eq!(issue.owner(), "acme");
        assert_eq!(issue.repository(), "site");
        assert_eq!(issue.number(), 42);
        assert_eq!(issue.node_id(), "I_kwDO");
        assert_eq!(issue.id(), 7);
        assert_eq!(issue.state(), Some(IssueState::Open));
        assert_eq!(issue.to_string(), "acme/site#42");
    }

    #[test]
    fn explicit_fields_take_precedence() {
        let mut reference = issue_ref("https://github.com/other/place/issues/1");
        reference.repository = Some("acme/site".to_string());
        reference.number = Some(42);

        let issue = Issue::from_ref(&reference).unwrap();

        assert_eq!(issue.to_string(), "acme/site#42");
    }

    #[test]
    fn slug_without_separator_fails() {
        let mut reference = issue_ref("https://github.com/acme/site/issues/42");
        reference.repository = Some("acme-site".to_string());

        assert!(matches!(
            Issue::from_ref(&reference),
            Err(IssueError::MalformedSlug { .. })
        ));
    }

    #[test]
    fn missing_number_fails() {
        let result = Issue::from_ref(&issue_ref("https://github.com/acme/site/pull/42"));

        assert!(matches!(result, Err(IssueError::InvalidIssueUrl { .. })));
    }

    #[test]
    fn deserializes_harness_json() {
        let json = r#"{"id":1,"nodeId":"I_1","url":"https://github.com/acme/site/issues/3","title":"t","state":"reopened"}"#;

        let reference: IssueRef = serde_json::from_str(json).unwrap();

        assert_eq!(reference.node_id, "I_1");
        assert_eq!(reference.state, Some(IssueState::Reopened));
        assert_eq!(
            serde_json::to_string(&reference).unwrap(),
            json
        );
    }
}
