//! Settings file deserialization.

use crate::config::ConfigError;
use crate::issues::DEFAULT_FIXER_LOGIN;
use crate::rate_limit::{RateLimitPolicy, DEFAULT_FALLBACK_WAIT, DEFAULT_MAX_RETRIES, MAX_WAIT};
use crate::retry::{
    RetryPolicy, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY,
    DEFAULT_MULTIPLIER,
};
use crate::runner::{BatchPolicy, DEFAULT_BATCH_SIZE};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parsed contents of a settings TOML file.
///
/// Every section is optional; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Polling schedule for linked pull request discovery.
    #[serde(default)]
    pub polling: PollingSettings,

    /// Transport-level rate limit handling.
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    /// How many issues one invocation processes.
    #[serde(default)]
    pub batch: BatchSettings,

    /// The automated fixer.
    #[serde(default)]
    pub fixer: FixerSettings,

    /// Issue filing.
    #[serde(default)]
    pub issue: IssueSettings,
}

/// `[polling]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PollingSettings {
    pub max_attempts: u32,
    pub initial_delay_secs: u64,
    pub max_delay_secs: u64,
    pub multiplier: u32,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_secs: DEFAULT_INITIAL_DELAY.as_secs(),
            max_delay_secs: DEFAULT_MAX_DELAY.as_secs(),
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

/// `[rate-limit]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RateLimitSettings {
    pub max_retries: u32,
    pub fallback_wait_secs: u64,
    pub max_wait_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            fallback_wait_secs: DEFAULT_FALLBACK_WAIT.as_secs(),
            max_wait_secs: MAX_WAIT.as_secs(),
        }
    }
}

/// `[batch]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BatchSettings {
    pub size: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// `[fixer]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FixerSettings {
    pub login: String,
}

impl Default for FixerSettings {
    fn default() -> Self {
        Self {
            login: DEFAULT_FIXER_LOGIN.to_string(),
        }
    }
}

/// `[issue]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct IssueSettings {
    /// Custom Handlebars template for issue bodies.
    pub template_path: Option<PathBuf>,
}

impl Settings {
    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first offending key.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: &str| {
            Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: message.to_string(),
            })
        };

        if self.polling.max_attempts == 0 {
            return invalid("polling.max-attempts must be at least 1");
        }

        if self.polling.multiplier == 0 {
            return invalid("polling.multiplier must be at least 1");
        }

        if self.polling.max_delay_secs < self.polling.initial_delay_secs {
            return invalid("polling.max-delay-secs must not be below polling.initial-delay-secs");
        }

        if self.batch.size == 0 {
            return invalid("batch.size must be at least 1");
        }

        if self.fixer.login.trim().is_empty() {
            return invalid("fixer.login is required");
        }

        Ok(())
    }

    /// Builds the polling schedule.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.polling.max_attempts,
            Duration::from_secs(self.polling.initial_delay_secs),
            Duration::from_secs(self.polling.max_delay_secs),
            self.polling.multiplier,
        )
    }

    /// Builds the transport throttle policy.
    #[must_use]
    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            self.rate_limit.max_retries,
            Duration::from_secs(self.rate_limit.fallback_wait_secs),
            Duration::from_secs(self.rate_limit.max_wait_secs),
        )
    }

    /// Builds the batch policy.
    #[must_use]
    pub fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy::new(self.batch.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();

        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.rate_limit_policy(), RateLimitPolicy::default());
        assert_eq!(settings.batch_policy().max_items(), 1);
        assert_eq!(settings.fixer.login, "copilot-swe-agent");
        assert!(settings.validate(Path::new("defaults")).is_ok());
    }

    #[test]
    fn parses_partial_sections() {
        let settings: Settings = toml::from_str(
            r#"
[polling]
max-attempts = 3
multiplier = 1

[rate-limit]
fallback-wait-secs = 5
"#,
        )
        .unwrap();

        assert_eq!(settings.polling.max_attempts, 3);
        assert_eq!(settings.polling.initial_delay_secs, 10);
        assert_eq!(settings.rate_limit.fallback_wait_secs, 5);
        assert_eq!(settings.rate_limit.max_retries, 3);
        assert_eq!(settings.batch.size, 1);
    }

    #[test]
    fn rejects_unknown_sections() {
        let result = toml::from_str::<Settings>("[polling-schedule]\nmax-attempts = 3\n");

        assert!(result.is_err());
    }

    #[test]
    fn validation_rejects_zero_values() {
        let path = Path::new("settings.toml");

        let mut settings = Settings::default();
        settings.polling.max_attempts = 0;
        assert!(matches!(
            settings.validate(path),
            Err(ConfigError::ValidationError { ref message, .. }) if message.contains("max-attempts")
        ));

        let mut settings = Settings::default();
        settings.batch.size = 0;
        assert!(settings.validate(path).is_err());

        let mut settings = Settings::default();
        settings.fixer.login = "  ".to_string();
        assert!(settings.validate(path).is_err());

        let mut settings = Settings::default();
        settings.polling.max_delay_secs = 1;
        assert!(settings.validate(path).is_err());
    }
}
