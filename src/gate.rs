//! Auth gate — interceptor wrapped around every server-side outbound fetch.
//!
//! The gate forwards the request to its delegate and inspects only the status.
//! A `401` short-circuits the page load according to `UnauthorizedPolicy`;
//! anything else is handed back untouched. No retries.

use axum::http::StatusCode;

use crate::error::PageError;
use crate::fetch::{Fetch, FetchRequest, FetchResponse};

pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// What the gate does when the upstream answers `401`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnauthorizedPolicy {
    /// Fail the load with a `401 unauthorized` application error.
    #[default]
    Error,
    /// Redirect the visitor to [`UNAUTHORIZED_PATH`] with `302`.
    Redirect,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate {
    policy: UnauthorizedPolicy,
}

impl AuthGate {
    #[must_use]
    pub fn new(policy: UnauthorizedPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> UnauthorizedPolicy {
        self.policy
    }

    /// Run `request` through `fetch`, rejecting `401` responses.
    ///
    /// # Errors
    ///
    /// Returns the policy's rejection on `401`, or [`PageError::Upstream`] if
    /// the delegate itself fails.
    pub async fn handle_fetch(&self, request: FetchRequest, fetch: &dyn Fetch) -> Result<FetchResponse, PageError> {
        let url = request.url.clone();
        let response = fetch.fetch(request).await?;

        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(%url, policy = ?self.policy, "upstream rejected credentials");
        Err(self.rejection())
    }

    fn rejection(&self) -> PageError {
        match self.policy {
            UnauthorizedPolicy::Error => PageError::http(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE),
            UnauthorizedPolicy::Redirect => PageError::redirect(UNAUTHORIZED_PATH),
        }
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
