use std::{collections::HashMap, fs, path::Path};

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const CONFIG_FILE: &str = "pixelboard.toml";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("backend url {raw:?} is not a valid url: {reason}")]
    InvalidUrl { raw: String, reason: String },
    #[error("backend url {raw:?} must use http or https")]
    UnsupportedScheme { raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend_url: Url,
}

impl ClientSettings {
    /// Applies a value given on the command line, which wins over every
    /// other source.
    pub fn with_backend_override(mut self, raw: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = raw {
            self.backend_url = parse_backend_url(raw)?;
        }
        Ok(self)
    }
}

/// Reads `pixelboard.toml` from the working directory, then the process
/// environment.
pub fn load_settings() -> Result<ClientSettings, ConfigError> {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Later sources win: file `backend_url`, then `PIXELBOARD_BACKEND_URL`,
/// then `APP__BACKEND_URL`. A missing or unreadable file is skipped.
pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, ConfigError> {
    let mut raw_url: Option<String> = None;

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("backend_url") {
                    raw_url = Some(v.clone());
                }
            }
            Err(err) => {
                warn!(path = %config_path.display(), %err, "ignoring unparsable config file")
            }
        }
    }

    if let Some(v) = env("PIXELBOARD_BACKEND_URL") {
        raw_url = Some(v);
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        raw_url = Some(v);
    }

    let settings = ClientSettings {
        backend_url: parse_backend_url(raw_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL))?,
    };
    debug!(backend_url = %settings.backend_url, "client settings loaded");
    Ok(settings)
}

pub fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        raw: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme {
            raw: raw.to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
