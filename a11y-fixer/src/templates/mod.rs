//! Template rendering using Handlebars.
//!
//! This module builds the title, labels and body of the issue filed for an
//! accessibility finding.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

use crate::issues::Finding;
use url::Url;

/// Built-in issue body template.
pub const DEFAULT_ISSUE_TEMPLATE: &str = r"## What
An accessibility scan flagged the element `{{html}}` on {{url}} because {{problem_short}}. See {{problem_url}} for why this was flagged.

To fix this, {{solution_short}}.
{{#if solution_long}}

Specifically:

{{solution_long}}
{{/if}}

## Acceptance Criteria
- [ ] The specific {{scanner_type}} violation reported in this issue can no longer be reproduced.
- [ ] The fix MUST meet WCAG 2.1 guidelines OR the accessibility standards set by the repository or organization.
- [ ] A test SHOULD be added so this {{scanner_type}} violation does not regress.
- [ ] The change MUST NOT introduce new accessibility issues or regressions.
";

/// Generates the issue title for a finding.
///
/// Format: "Accessibility issue: {Problem short} on {url path}"
///
/// # Errors
///
/// Returns [`TemplateError::EmptyProblem`] for an empty problem description and
/// [`TemplateError::InvalidFindingUrl`] if the page URL does not parse.
pub fn generate_issue_title(finding: &Finding) -> Result<String, TemplateError> {
    let mut chars = finding.problem_short.chars();
    let Some(first) = chars.next() else {
        return Err(TemplateError::EmptyProblem {
            rule_id: finding.rule_id.clone(),
        });
    };

    let page = Url::parse(&finding.url).map_err(|source| TemplateError::InvalidFindingUrl {
        url: finding.url.clone(),
        source,
    })?;

    Ok(format!(
        "Accessibility issue: {}{} on {}",
        first.to_uppercase(),
        chars.as_str(),
        page.path()
    ))
}

/// Generates the labels applied to the issue for a finding.
#[must_use]
pub fn generate_issue_labels(finding: &Finding) -> Vec<String> {
    vec![
        format!("{} rule: {}", finding.scanner_type, finding.rule_id),
        format!("{}-scanning-issue", finding.scanner_type),
    ]
}

/// Turns a detailed solution into a markdown list.
///
/// Non-empty lines become bullets, except the "Fix any"/"Fix all" lead-ins.
#[must_use]
pub fn format_solution_long(solution: &str) -> String {
    solution
        .split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("Fix any") || trimmed.starts_with("Fix all")
            {
                line.to_string()
            } else {
                format!("- {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_finding() -> Finding {
        Finding {
            scanner_type: "axe".to_string(),
            rule_id: "color-contrast".to_string(),
            url: "https://example.com/docs/start?tab=1".to_string(),
            html: "<span>low</span>".to_string(),
            problem_short: "elements must meet minimum color contrast ratio thresholds"
                .to_string(),
            problem_url: "https://dequeuniversity.com/rules/axe/4.10/color-contrast".to_string(),
            solution_short: "ensure the contrast is sufficient".to_string(),
            solution_long: None,
        }
    }

    #[test]
    fn test_generate_issue_title() {
        let title = generate_issue_title(&sample_finding()).unwrap();

        assert_eq!(
            title,
            "Accessibility issue: Elements must meet minimum color contrast ratio thresholds on /docs/start"
        );
    }

    #[test]
    fn title_requires_problem() {
        let mut finding = sample_finding();
        finding.problem_short.clear();

        assert!(matches!(
            generate_issue_title(&finding),
            Err(TemplateError::EmptyProblem { .. })
        ));
    }

    #[test]
    fn title_requires_valid_url() {
        let mut finding = sample_finding();
        finding.url = "not a url".to_string();

        assert!(matches!(
            generate_issue_title(&finding),
            Err(TemplateError::InvalidFindingUrl { .. })
        ));
    }

    #[test]
    fn test_generate_issue_labels() {
        assert_eq!(
            generate_issue_labels(&sample_finding()),
            vec!["axe rule: color-contrast", "axe-scanning-issue"]
        );
    }

    #[test]
    fn bullets_solution_lines() {
        let formatted = format_solution_long(
            "Fix any of the following:\nElement has insufficient contrast\n\nFix all of the following:\nUse a darker color",
        );

        assert_eq!(
            formatted,
            "Fix any of the following:\n- Element has insufficient contrast\n\nFix all of the following:\n- Use a darker color"
        );
    }
}
