//! Template rendering error types.

/// Template rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// Template registration error.
    #[error("Template registration error: {0}")]
    RegistrationError(#[from] handlebars::TemplateError),

    /// The finding's page URL could not be parsed.
    #[error("Invalid finding URL '{url}': {source}")]
    InvalidFindingUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The finding has no problem description to title the issue with.
    #[error("Finding for rule '{rule_id}' has an empty problem description")]
    EmptyProblem { rule_id: String },
}
