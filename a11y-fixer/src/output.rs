//! GitHub Actions workflow output and failure signalling.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the step output file.
pub const OUTPUT_ENV_VAR: &str = "GITHUB_OUTPUT";

/// Errors that can occur while writing workflow outputs.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to append to the output file.
    #[error("Failed to write output '{name}' to '{path}': {source}")]
    IoError {
        name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Sets a step output.
///
/// Appends to the file named by `GITHUB_OUTPUT`, using the multi-line form
/// when `value` spans lines. Without that variable the output is printed as
/// `name=value`.
///
/// # Errors
///
/// Returns [`OutputError::IoError`] if the output file cannot be written.
pub fn set_output(name: &str, value: &str) -> Result<(), OutputError> {
    let Some(path) = std::env::var_os(OUTPUT_ENV_VAR).filter(|p| !p.is_empty()) else {
        println!("{name}={value}");
        return Ok(());
    };

    let path = Path::new(&path);
    debug!(name, path = %path.display(), "Writing step output");

    let io_error = |source| OutputError::IoError {
        name: name.to_string(),
        path: path.display().to_string(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;
    file.write_all(format_output(name, value).as_bytes())
        .map_err(io_error)
}

/// Reports a failure to the workflow as an error annotation.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

fn format_output(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }

    let mut delimiter = format!("ghadelimiter_{}", unique_suffix());
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        ^ u128::from(std::process::id())
}

/// Escapes `%`, `\r` and `\n` for workflow commands.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
