//! Per-issue work unit.

use crate::issues::IssueRef;
use crate::pull_requests::PullRequest;
use serde::Serialize;
use tracing::warn;

/// Where a [`Fixing`] is in its lifecycle.
///
/// `Created → Assigning → Polling → Linked | Unlinked`; any non-terminal
/// state may move to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixingState {
    Created,
    Assigning,
    Polling,
    Linked,
    Unlinked,
    Failed,
}

impl FixingState {
    /// Returns true once no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Linked | Self::Unlinked | Self::Failed)
    }

    /// Returns true if moving to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(&self, next: FixingState) -> bool {
        use FixingState::*;
        matches!(
            (*self, next),
            (Created, Assigning)
                | (Assigning, Polling)
                | (Polling, Linked)
                | (Polling, Unlinked)
                | (Created | Assigning | Polling, Failed)
        )
    }
}

/// One issue paired with the pull request the fixer opened for it, if any.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixing {
    issue: IssueRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pull_request: Option<PullRequest>,
    #[serde(skip)]
    state: FixingState,
}

impl Fixing {
    /// Starts tracking an issue.
    #[must_use]
    pub fn new(issue: IssueRef) -> Self {
        Self {
            issue,
            pull_request: None,
            state: FixingState::Created,
        }
    }

    /// The issue being fixed.
    pub fn issue(&self) -> &IssueRef {
        &self.issue
    }

    /// The linked pull request, once found.
    pub fn pull_request(&self) -> Option<&PullRequest> {
        self.pull_request.as_ref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FixingState {
        self.state
    }

    /// Moves to `next`, ignoring (and logging) disallowed transitions.
    pub(crate) fn transition(&mut self, next: FixingState) -> bool {
        if !self.state.can_transition_to(next) {
            warn!(from = ?self.state, to = ?next, "Ignoring invalid fixing transition");
            return false;
        }
        self.state = next;
        true
    }

    /// Attaches the discovered pull request and marks the fixing linked.
    pub(crate) fn link(&mut self, pull_request: PullRequest) -> bool {
        if !self.transition(FixingState::Linked) {
            return false;
        }
        self.pull_request = Some(pull_request);
        true
    }
}
