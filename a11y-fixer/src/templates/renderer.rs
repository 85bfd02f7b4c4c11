//! Template renderer.

use super::{format_solution_long, TemplateError};
use crate::issues::Finding;
use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::json;

const ISSUE_TEMPLATE_NAME: &str = "issue";

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
/// - `eq` helper for equality comparisons
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Findings quote raw markup, which must reach the issue body verbatim
    hbs.register_escape_fn(no_escape);

    hbs.set_strict_mode(true);
    hbs.register_helper("eq", Box::new(eq_helper));

    hbs
}

/// Helper function for equality comparison in templates.
///
/// Usage: `{{#if (eq variable "value")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

/// Renders issue bodies from a single registered template.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Creates a renderer for the given issue template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::RegistrationError`] if the template does not parse.
    pub fn new(issue_template: &str) -> Result<Self, TemplateError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(ISSUE_TEMPLATE_NAME, issue_template)?;
        Ok(Self { handlebars })
    }

    /// Renders the issue body for a finding.
    ///
    /// Available variables: `scanner_type`, `rule_id`, `url`, `html`,
    /// `problem_short`, `problem_url`, `solution_short`, `solution_long`
    /// (bulleted, empty when the finding has none).
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_issue_body(&self, finding: &Finding) -> Result<String, TemplateError> {
        let data = json!({
            "scanner_type": finding.scanner_type,
            "rule_id": finding.rule_id,
            "url": finding.url,
            "html": finding.html,
            "problem_short": finding.problem_short,
            "problem_url": finding.problem_url,
            "solution_short": finding.solution_short,
            "solution_long": finding
                .solution_long
                .as_deref()
                .map(format_solution_long)
                .unwrap_or_default(),
        });

        Ok(self.handlebars.render(ISSUE_TEMPLATE_NAME, &data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::DEFAULT_ISSUE_TEMPLATE;

    fn sample_finding() -> Finding {
        Finding {
            scanner_type: "axe".to_string(),
            rule_id: "image-alt".to_string(),
            url: "https://example.com/about".to_string(),
            html: "<img src=\"logo.png\">".to_string(),
            problem_short: "images must have alternative text".to_string(),
            problem_url: "https://dequeuniversity.com/rules/axe/4.10/image-alt".to_string(),
            solution_short: "ensure image elements have alternative text".to_string(),
            solution_long: Some(
                "Fix any of the following:\n  Element does not have an alt attribute".to_string(),
            ),
        }
    }

    #[test]
    fn renders_default_template() {
        let renderer = TemplateRenderer::new(DEFAULT_ISSUE_TEMPLATE).unwrap();

        let body = renderer.render_issue_body(&sample_finding()).unwrap();

        assert!(body.contains("## What"));
        assert!(body.contains("`<img src=\"logo.png\">` on https://example.com/about"));
        assert!(body.contains("To fix this, ensure image elements have alternative text."));
        assert!(body.contains("Specifically:"));
        assert!(body.contains("-   Element does not have an alt attribute"));
        assert!(body.contains("## Acceptance Criteria"));
        assert!(body.contains("specific axe violation"));
    }

    #[test]
    fn omits_details_without_solution_long() {
        let renderer = TemplateRenderer::new(DEFAULT_ISSUE_TEMPLATE).unwrap();
        let mut finding = sample_finding();
        finding.solution_long = None;

        let body = renderer.render_issue_body(&finding).unwrap();

        assert!(!body.contains("Specifically:"));
    }

    #[test]
    fn renders_custom_template_with_eq() {
        let renderer = TemplateRenderer::new(
            r#"{{#if (eq scanner_type "axe")}}axe: {{rule_id}}{{else}}other{{/if}}"#,
        )
        .unwrap();

        let body = renderer.render_issue_body(&sample_finding()).unwrap();

        assert_eq!(body, "axe: image-alt");
    }

    #[test]
    fn unknown_variable_fails_in_strict_mode() {
        let renderer = TemplateRenderer::new("{{missing}}").unwrap();

        let result = renderer.render_issue_body(&sample_finding());

        assert!(matches!(result, Err(TemplateError::RenderError(_))));
    }

    #[test]
    fn malformed_template_is_rejected() {
        let result = TemplateRenderer::new("{{#if url}}unclosed");

        assert!(matches!(result, Err(TemplateError::RegistrationError(_))));
    }

    #[test]
    fn test_no_html_escaping() {
        let renderer = TemplateRenderer::new("{{html}}").unwrap();

        let body = renderer.render_issue_body(&sample_finding()).unwrap();

        assert_eq!(body, "<img src=\"logo.png\">");
    }
}
