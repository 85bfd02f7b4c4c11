//! Settings loading.
//!
//! Settings come from an optional TOML file. When no file is named on the
//! command line, the `A11Y_FIXER_CONFIG` environment variable is consulted,
//! and when neither is set the built-in defaults apply.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{
    BatchSettings, FixerSettings, IssueSettings, PollingSettings, RateLimitSettings, Settings,
};

use crate::templates::DEFAULT_ISSUE_TEMPLATE;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the settings file.
pub const CONFIG_ENV_VAR: &str = "A11Y_FIXER_CONFIG";

/// Loads and validates a settings file.
///
/// A relative `issue.template-path` is resolved against the directory
/// containing the settings file.
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing, unreadable, malformed, or
/// fails validation.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    debug!(path = %path.display(), "Loading settings");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
        path: path.display().to_string(),
        source: e,
    })?;

    settings.validate(path)?;

    if let Some(template_path) = settings.issue.template_path.take() {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        settings.issue.template_path = Some(base.join(template_path));
    }

    Ok(settings)
}

/// Resolves the settings for a run.
///
/// Uses `explicit` when given, else the file named by [`CONFIG_ENV_VAR`], else
/// the defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if a named settings file cannot be loaded.
pub fn resolve_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let from_env = std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => {
            info!(path = %path.display(), "Using settings file");
            load_settings(&path)
        }
        None => {
            debug!("No settings file given, using defaults");
            Ok(Settings::default())
        }
    }
}

/// Returns the issue body template selected by the settings.
///
/// # Errors
///
/// Returns [`ConfigError`] if the custom template cannot be read or is empty.
pub fn load_issue_template(settings: &Settings) -> Result<String, ConfigError> {
    let Some(path) = settings.issue.template_path.as_deref() else {
        return Ok(DEFAULT_ISSUE_TEMPLATE.to_string());
    };

    let template = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    if template.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            path: path.display().to_string(),
            message: "issue template is empty".to_string(),
        });
    }

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_settings_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a11y-fixer.toml");
        fs::write(
            &path,
            r#"
[fixer]
login = "my-bot"

[issue]
template-path = "templates/issue.md"
"#,
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();

        assert_eq!(settings.fixer.login, "my-bot");
        assert_eq!(
            settings.issue.template_path,
            Some(temp.path().join("templates/issue.md"))
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let temp = TempDir::new().unwrap();

        let result = load_settings(&temp.path().join("nope.toml"));

        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "[polling\nmax-attempts = 3").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(ConfigError::TomlError { .. })
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("zero.toml");
        fs::write(&path, "[batch]\nsize = 0\n").unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn resolves_from_environment() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.toml");
        fs::write(&path, "[polling]\nmax-attempts = 2\n").unwrap();

        let settings = temp_env::with_var(CONFIG_ENV_VAR, Some(&path), || {
            resolve_settings(None).unwrap()
        });

        assert_eq!(settings.polling.max_attempts, 2);
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("explicit.toml");
        fs::write(&explicit, "[batch]\nsize = 4\n").unwrap();

        let settings = temp_env::with_var(CONFIG_ENV_VAR, Some("/does/not/exist.toml"), || {
            resolve_settings(Some(&explicit)).unwrap()
        });

        assert_eq!(settings.batch.size, 4);
    }

    #[test]
    fn defaults_without_any_file() {
        let settings = temp_env::with_var_unset(CONFIG_ENV_VAR, || resolve_settings(None).unwrap());

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn loads_default_and_custom_templates() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            load_issue_template(&Settings::default()).unwrap(),
            DEFAULT_ISSUE_TEMPLATE
        );

        let template_path = temp.path().join("issue.md");
        fs::write(&template_path, "{{problem_short}}").unwrap();
        let mut settings = Settings::default();
        settings.issue.template_path = Some(template_path);
        assert_eq!(load_issue_template(&settings).unwrap(), "{{problem_short}}");

        let empty_path = temp.path().join("empty.md");
        fs::write(&empty_path, "  \n").unwrap();
        settings.issue.template_path = Some(empty_path);
        assert!(matches!(
            load_issue_template(&settings),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
