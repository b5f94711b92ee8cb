//! User loader — per-navigation fetch of the current user.
//!
//! DESIGN
//! ======
//! A page handler builds a `LoadEvent` for the incoming navigation and asks a
//! `UserLoader` for its data. The event decides how outbound fetches travel
//! (through the auth gate or not, with the visitor's cookies or not); the
//! loader decides what the answer from `GET {API_BASE}/me` means.
//!
//! Two presets exist:
//! - `LoaderConfig::app()` forwards credentials and redirects `401` to `/login`.
//! - `LoaderConfig::server_only()` omits credentials and parses whatever comes
//!   back, error statuses included.

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode, header};
use reqwest::Url;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{ConfigError, WebConfig};
use crate::error::PageError;
use crate::fetch::{Credentials, Fetch, FetchRequest, FetchResponse};
use crate::gate::AuthGate;

pub const ME_PATH: &str = "me";
pub const LOGIN_PATH: &str = "/login";

// =============================================================================
// CONFIG
// =============================================================================

/// How non-`401` error statuses from `/me` are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpstreamStatusPolicy {
    /// Parse the body as user data regardless of status.
    #[default]
    PassThrough,
    /// Fail the load with [`PageError::UpstreamStatus`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub credentials: Credentials,
    /// Where to send the visitor on `401`. `None` means no special handling.
    pub login_redirect: Option<String>,
    pub status_policy: UpstreamStatusPolicy,
}

impl LoaderConfig {
    #[must_use]
    pub fn app() -> Self {
        Self {
            credentials: Credentials::Include,
            login_redirect: Some(LOGIN_PATH.to_owned()),
            status_policy: UpstreamStatusPolicy::PassThrough,
        }
    }

    #[must_use]
    pub fn server_only() -> Self {
        Self { credentials: Credentials::Omit, login_redirect: None, status_policy: UpstreamStatusPolicy::PassThrough }
    }

    #[must_use]
    pub fn with_status_policy(mut self, status_policy: UpstreamStatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }
}

/// Data exposed to a rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageData {
    pub user_data: serde_json::Value,
}

// =============================================================================
// LOAD EVENT
// =============================================================================

/// One page navigation. Owns nothing mutable; cheap to build per request.
pub struct LoadEvent {
    id: Uuid,
    fetch: Arc<dyn Fetch>,
    gate: Option<AuthGate>,
    cookies: Option<HeaderValue>,
}

impl LoadEvent {
    #[must_use]
    pub fn new(fetch: Arc<dyn Fetch>) -> Self {
        Self { id: Uuid::new_v4(), fetch, gate: None, cookies: None }
    }

    /// Route this event's fetches through `gate` (server-side loads).
    #[must_use]
    pub fn with_gate(mut self, gate: AuthGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// The visitor's `Cookie` header, attached to credentialed fetches.
    #[must_use]
    pub fn with_cookies(mut self, cookies: Option<HeaderValue>) -> Self {
        self.cookies = cookies;
        self
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Fetch on behalf of this navigation.
    ///
    /// # Errors
    ///
    /// Returns the gate's rejection on `401` when a gate is set, or
    /// [`PageError::Upstream`] on transport failure.
    pub async fn fetch(&self, mut request: FetchRequest) -> Result<FetchResponse, PageError> {
        if request.credentials == Credentials::Include {
            if let Some(cookies) = &self.cookies {
                request.headers.insert(header::COOKIE, cookies.clone());
            }
        }

        match &self.gate {
            Some(gate) => gate.handle_fetch(request, self.fetch.as_ref()).await,
            None => Ok(self.fetch.fetch(request).await?),
        }
    }
}

// =============================================================================
// LOADER
// =============================================================================

#[derive(Debug, Clone)]
pub struct UserLoader {
    me_url: Url,
    config: LoaderConfig,
}

impl UserLoader {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `{api_url}/me` is not a valid URL.
    pub fn new(web: &WebConfig, config: LoaderConfig) -> Result<Self, ConfigError> {
        Ok(Self { me_url: web.api_endpoint(ME_PATH)?, config })
    }

    #[must_use]
    pub fn me_url(&self) -> &Url {
        &self.me_url
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Fetch the current user for `event`.
    ///
    /// # Errors
    ///
    /// - [`PageError::Redirect`] to the login path on `401` when configured.
    /// - [`PageError::UpstreamStatus`] on an error status under `Reject`.
    /// - [`PageError::Upstream`] on transport failure or a non-JSON body.
    /// - Whatever the event's gate produces.
    pub async fn load(&self, event: &LoadEvent) -> Result<PageData, PageError> {
        let load_id = event.id();
        tracing::debug!(%load_id, url = %self.me_url, "fetching user data");

        let request = FetchRequest::get(self.me_url.clone())
            .with_credentials(self.config.credentials)
            .with_header(header::ACCEPT, HeaderValue::from_static("application/json"));
        let response = event.fetch(request).await?;
        tracing::debug!(%load_id, status = %response.status, bytes = response.body.len(), "user data response");

        if response.status == StatusCode::UNAUTHORIZED {
            if let Some(location) = &self.config.login_redirect {
                return Err(PageError::redirect(location.clone()));
            }
        }

        if self.config.status_policy == UpstreamStatusPolicy::Reject && !response.status.is_success() {
            return Err(PageError::UpstreamStatus { status: response.status });
        }

        let user_data = response.json::<serde_json::Value>()?;
        Ok(PageData { user_data })
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
