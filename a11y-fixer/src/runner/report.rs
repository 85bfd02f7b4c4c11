//! Run results handed back to the harness.

use super::Fixing;
use crate::issues::IssueRef;
use crate::summary::RunSummary;

/// Outcome of a `fix` run.
#[derive(Debug, Clone)]
pub struct FixReport {
    /// Processed fixings, at most one batch.
    pub fixings: Vec<Fixing>,
    /// Counters for the run.
    pub summary: RunSummary,
}

/// Outcome of a `file` run.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Issues created, in finding order.
    pub issues: Vec<IssueRef>,
    /// Counters for the run.
    pub summary: RunSummary,
}
