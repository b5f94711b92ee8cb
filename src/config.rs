//! Web server configuration parsed from environment variables.
//!
//! Everything is read once at startup and injected into the loaders, the
//! gate, and the router. Nothing downstream touches the environment.

use std::path::PathBuf;

use reqwest::Url;

use crate::gate::UnauthorizedPolicy;
use crate::loader::UpstreamStatusPolicy;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Base URL of the upstream API, e.g. `https://api.example.com`.
    pub api_url: Url,
    pub port: u16,
    pub gate_policy: UnauthorizedPolicy,
    /// Status handling for the server-side loader.
    pub status_policy: UpstreamStatusPolicy,
    /// Directory of prerendered assets served as the router fallback.
    pub static_dir: Option<PathBuf>,
}

impl WebConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `PUBLIC_API_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `AUTH_GATE_POLICY`: `error` (default) or `redirect`
    /// - `UPSTREAM_STATUS_POLICY`: `pass_through` (default) or `reject`
    /// - `STATIC_DIR`: unset by default
    ///
    /// # Errors
    ///
    /// Returns an error if `PUBLIC_API_URL` is missing or any value fails to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`WebConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_api_url = lookup("PUBLIC_API_URL").ok_or(ConfigError::Missing { var: "PUBLIC_API_URL" })?;
        let api_url = parse_api_url(&raw_api_url)?;
        let port = parse_port(lookup("PORT").as_deref())?;
        let gate_policy = parse_gate_policy(lookup("AUTH_GATE_POLICY").as_deref())?;
        let status_policy = parse_status_policy(lookup("UPSTREAM_STATUS_POLICY").as_deref())?;
        let static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { api_url, port, gate_policy, status_policy, static_dir })
    }

    /// Resolve `path` against the API base by plain concatenation, so a base
    /// with its own path prefix keeps it (`/v1` + `me` = `/v1/me`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the joined string is not a URL.
    pub fn api_endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let joined = format!(
            "{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ConfigError::Invalid { var: "PUBLIC_API_URL", reason: e.to_string() })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::Invalid { var: "PUBLIC_API_URL", reason: e.to_string() })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            var: "PUBLIC_API_URL",
            reason: format!("unsupported scheme '{}' (expected 'http' or 'https')", url.scheme()),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid {
            var: "PUBLIC_API_URL",
            reason: "base URL must not carry a query or fragment".to_owned(),
        });
    }
    Ok(url)
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid { var: "PORT", reason: e.to_string() }),
    }
}

fn parse_gate_policy(raw: Option<&str>) -> Result<UnauthorizedPolicy, ConfigError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref().unwrap_or("error") {
        "error" => Ok(UnauthorizedPolicy::Error),
        "redirect" => Ok(UnauthorizedPolicy::Redirect),
        other => Err(ConfigError::Invalid {
            var: "AUTH_GATE_POLICY",
            reason: format!("unknown policy '{other}' (expected 'error' or 'redirect')"),
        }),
    }
}

fn parse_status_policy(raw: Option<&str>) -> Result<UpstreamStatusPolicy, ConfigError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref().unwrap_or("pass_through") {
        "pass_through" => Ok(UpstreamStatusPolicy::PassThrough),
        "reject" => Ok(UpstreamStatusPolicy::Reject),
        other => Err(ConfigError::Invalid {
            var: "UPSTREAM_STATUS_POLICY",
            reason: format!("unknown policy '{other}' (expected 'pass_through' or 'reject')"),
        }),
    }
}


#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
