//! Accessibility scan findings.

use serde::{Deserialize, Serialize};

/// A single accessibility defect reported by a scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Scanner that reported the finding (e.g. "axe").
    pub scanner_type: String,

    /// Scanner rule identifier.
    pub rule_id: String,

    /// Page the finding was reported on.
    pub url: String,

    /// Offending markup snippet.
    pub html: String,

    /// Short problem description; must not be empty.
    pub problem_short: String,

    /// Link explaining the problem.
    pub problem_url: String,

    /// Short solution description.
    pub solution_short: String,

    /// Detailed, line-based solution description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_long: Option<String>,
}
