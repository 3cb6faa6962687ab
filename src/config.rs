//! Console configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://stg-api.fitcircle.coach/api/v1";
pub const DEFAULT_ROLE_PREFIX: &str = "super-admin";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STATE_PATH: &str = ".circle-admin/state.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// API root without a trailing slash, e.g. `https://host/api/v1`.
    pub base_url: String,
    /// Path segment prepended to every admin resource (`super-admin`).
    pub role_prefix: String,
    pub timeouts: Timeouts,
    /// JSON file backing durable storage.
    pub state_path: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            role_prefix: DEFAULT_ROLE_PREFIX.to_owned(),
            timeouts: Timeouts::default(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
        }
    }
}

impl AdminConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ADMIN_API_BASE_URL`: default staging API
    /// - `ADMIN_API_ROLE_PREFIX`: default `super-admin`
    /// - `ADMIN_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ADMIN_CONNECT_TIMEOUT_SECS`: default 10
    /// - `ADMIN_STATE_PATH`: default `.circle-admin/state.json`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the base URL is not http(s) or the
    /// role prefix is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(
            &std::env::var("ADMIN_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned()),
        )?;
        let role_prefix = std::env::var("ADMIN_API_ROLE_PREFIX")
            .unwrap_or_else(|_| DEFAULT_ROLE_PREFIX.to_owned())
            .trim_matches('/')
            .to_owned();
        if role_prefix.is_empty() {
            return Err(ConfigError::Invalid { var: "ADMIN_API_ROLE_PREFIX", reason: "must not be empty".into() });
        }
        let timeouts = Timeouts {
            request_secs: env_parse("ADMIN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("ADMIN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let state_path = std::env::var("ADMIN_STATE_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH), PathBuf::from);

        Ok(Self { base_url, role_prefix, timeouts, state_path })
    }

    /// Full path of an admin resource, e.g. `users` -> `/super-admin/users`.
    #[must_use]
    pub fn admin_path(&self, resource: &str) -> String {
        format!("/{}/{}", self.role_prefix, resource.trim_start_matches('/'))
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Trim trailing slashes and require an http(s) scheme.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for any other scheme.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            var: "ADMIN_API_BASE_URL",
            reason: format!("expected an http(s) URL, got '{trimmed}'"),
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
