//! Page-level errors and their HTTP mapping.
//!
//! A page load ends in exactly one of: rendered data, a redirect, a typed HTTP
//! error, or an unexpected upstream failure. The last kind is logged here;
//! the first three are ordinary outcomes and are not.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};

use crate::fetch::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Application error surfaced to the visitor with its own status.
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    /// Load terminated with a redirect; the page is not rendered.
    #[error("redirect ({status}) to {location}")]
    Redirect { status: StatusCode, location: String },

    #[error(transparent)]
    Upstream(#[from] FetchError),

    /// Upstream answered with a status the active policy refuses to render.
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: StatusCode },

    #[error("page data serialization failed: {0}")]
    Render(#[from] serde_json::Error),
}

impl PageError {
    #[must_use]
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http { status, message: message.into() }
    }

    /// A `302 Found` redirect.
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect { status: StatusCode::FOUND, location: location.into() }
    }
}

/// Build a bare redirect response with an explicit status.
pub fn redirect_response(status: StatusCode, location: &str) -> Response {
    (status, [(header::LOCATION, location.to_owned())]).into_response()
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::Http { status, message } => (status, Json(serde_json::json!({ "message": message }))).into_response(),
            Self::Redirect { status, location } => redirect_response(status, &location),
            Self::Upstream(e) => {
                tracing::error!(error = %e, "upstream failure during page load");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Self::UpstreamStatus { status } => {
                tracing::error!(%status, "upstream status rejected during page load");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Self::Render(e) => {
                tracing::error!(error = %e, "failed to render page data");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
