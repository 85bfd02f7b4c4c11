//! Seam between the runner and GitHub.

use crate::github::{GitHubClient, Transport};
use crate::issues::{Issue, IssueError, IssueRef, NewIssue, RepoSlug};
use crate::pull_requests::{PrError, PullRequest};
use futures::future::{BoxFuture, FutureExt};

/// Issue operations the runner depends on.
///
/// Implemented by [`GitHubClient`]; tests substitute scripted trackers.
pub trait IssueTracker: Send + Sync {
    /// Files a new issue.
    fn create_issue<'a>(
        &'a self,
        slug: &'a RepoSlug,
        issue: &'a NewIssue,
    ) -> BoxFuture<'a, Result<IssueRef, IssueError>>;

    /// Assigns the fixer to an issue.
    fn assign_issue<'a>(
        &'a self,
        issue: &'a Issue,
        fixer_login: &'a str,
    ) -> BoxFuture<'a, Result<(), IssueError>>;

    /// Looks up the pull request linked to an issue.
    fn get_linked_pr<'a>(
        &'a self,
        issue: &'a Issue,
    ) -> BoxFuture<'a, Result<Option<PullRequest>, PrError>>;
}

impl<T: Transport> IssueTracker for GitHubClient<T> {
    fn create_issue<'a>(
        &'a self,
        slug: &'a RepoSlug,
        issue: &'a NewIssue,
    ) -> BoxFuture<'a, Result<IssueRef, IssueError>> {
        crate::issues::create_issue(self, slug, issue).boxed()
    }

    fn assign_issue<'a>(
        &'a self,
        issue: &'a Issue,
        fixer_login: &'a str,
    ) -> BoxFuture<'a, Result<(), IssueError>> {
        crate::issues::assign_issue(self, issue, fixer_login).boxed()
    }

    fn get_linked_pr<'a>(
        &'a self,
        issue: &'a Issue,
    ) -> BoxFuture<'a, Result<Option<PullRequest>, PrError>> {
        crate::pull_requests::get_linked_pr(self, issue).boxed()
    }
}
