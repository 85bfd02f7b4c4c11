//! Runner configuration.

use crate::config::Settings;

/// Configuration for a fixer run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// GitHub token used for API calls.
    token: String,
    /// Target repository as `owner/name`.
    repository: String,
    /// GitHub API root; octocrab's default when unset.
    api_url: Option<String>,
    /// Polling, throttling, batch and fixer settings.
    settings: Settings,
}

impl RunnerConfig {
    /// Creates a new configuration with default settings.
    pub fn new(token: String, repository: String) -> Self {
        Self {
            token,
            repository,
            api_url: None,
            settings: Settings::default(),
        }
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Points the client at another API root, e.g. a GitHub Enterprise server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the target repository slug.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the API root override, if any.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
