//! Run summary types.

use crate::runner::{Fixing, FixingState};
use std::fmt;

/// Counters describing a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of findings handed to `file`.
    pub findings_received: usize,

    /// Number of issues filed.
    pub issues_filed: usize,

    /// Number of issues handed to `fix`.
    pub issues_received: usize,

    /// Number of issues assigned and polled.
    pub issues_processed: usize,

    /// Number of issues left for a later invocation by the batch policy.
    pub issues_deferred: usize,

    /// Number of issues with a linked pull request.
    pub prs_linked: usize,

    /// Number of issues still without a linked pull request.
    pub prs_unlinked: usize,
}

impl RunSummary {
    /// Updates the summary with a finished fixing.
    pub fn record_fixing(&mut self, fixing: &Fixing) {
        self.issues_processed += 1;
        match fixing.state() {
            FixingState::Linked => self.prs_linked += 1,
            FixingState::Unlinked => self.prs_unlinked += 1,
            _ => {}
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        if self.findings_received > 0 || self.issues_filed > 0 {
            writeln!(f, "  Findings received: {}", self.findings_received)?;
            writeln!(f, "  Issues filed: {}", self.issues_filed)?;
        }
        if self.issues_received > 0 {
            writeln!(f, "  Issues received: {}", self.issues_received)?;
            writeln!(f, "  Issues processed: {}", self.issues_processed)?;
            writeln!(f, "  Issues deferred: {}", self.issues_deferred)?;
            writeln!(f, "  Linked PRs: {}", self.prs_linked)?;
            writeln!(f, "  Without PR: {}", self.prs_unlinked)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::IssueRef;

    #[test]
    fn counts_only_terminal_outcomes() {
        let mut summary = RunSummary::default();

        summary.record_fixing(&Fixing::new(IssueRef {
            id: 1,
            node_id: "I_1".to_string(),
            url: "https://github.com/acme/site/issues/1".to_string(),
            title: String::new(),
            state: None,
            repository: None,
            number: None,
        }));

        assert_eq!(summary.issues_processed, 1);
        assert_eq!(summary.prs_linked + summary.prs_unlinked, 0);
    }

    #[test]
    fn displays_fix_counters() {
        let summary = RunSummary {
            issues_received: 2,
            issues_processed: 1,
            issues_deferred: 1,
            prs_linked: 1,
            ..RunSummary::default()
        };

        let text = summary.to_string();

        assert!(text.contains("Issues deferred: 1"));
        assert!(text.contains("Linked PRs: 1"));
        assert!(!text.contains("Issues filed"));
    }
}
