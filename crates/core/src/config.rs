//! Redlib base address resolution
//!
//! Precedence: explicit value (CLI flag or `REDLIB_URL`), then the
//! `REDLIB_URL` key of `~/.config/redlib/config.json`, then the local default.
//! The shell does the reading; these functions only decide.

use std::path::{Path, PathBuf};

pub const ENV_VAR: &str = "REDLIB_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("config key {0} must be a string")]
    NotAString(&'static str),
}

/// `<home>/.config/redlib/config.json`
pub fn config_file_path(home: &Path) -> PathBuf {
    home.join(".config").join("redlib").join("config.json")
}

/// Read the base address out of a config file's contents.
///
/// A missing key is `Ok(None)`; broken JSON or a non-string value is an error.
pub fn base_url_from_file(contents: &str) -> Result<Option<String>, ConfigError> {
    let value: serde_json::Value = serde_json::from_str(contents)?;

    match value.get(ENV_VAR) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(url)) => Ok(Some(url.clone())),
        Some(_) => Err(ConfigError::NotAString(ENV_VAR)),
    }
}

/// Strip trailing slashes from a base address.
pub fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Pick the first non-empty candidate, falling back to [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(explicit: Option<String>, from_file: Option<String>) -> String {
    let url = explicit
        .filter(|url| !url.trim().is_empty())
        .or_else(|| from_file.filter(|url| !url.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    trim_base_url(url.trim())
}
