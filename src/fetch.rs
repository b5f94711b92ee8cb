//! Outbound HTTP seam.
//!
//! DESIGN
//! ======
//! Page loads never call reqwest directly. They describe a `FetchRequest` and
//! hand it to a `Fetch` implementation, so the auth gate can wrap any delegate
//! and tests can swap in a canned one. `HttpFetch` is the production delegate.

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
use reqwest::Url;
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("freudbot-web/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// Whether the visitor's credentials (cookies, HTTP auth) accompany a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    Include,
    #[default]
    Omit,
}

/// Description of an outbound HTTP request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub credentials: Credentials,
}

impl FetchRequest {
    /// A bare `GET` with no headers and credentials omitted.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self { method: Method::GET, url, headers: HeaderMap::new(), credentials: Credentials::Omit }
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A fully buffered upstream response.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self { status, headers: HeaderMap::new(), body: body.into() }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Json`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::Json(e.to_string()))
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("upstream request failed: {0}")]
    Request(String),

    #[error("upstream body read failed: {0}")]
    Body(String),

    #[error("upstream body is not valid JSON: {0}")]
    Json(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// FETCH TRAIT
// =============================================================================

/// Something that can turn a `FetchRequest` into a `FetchResponse`.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

/// reqwest-backed delegate used in production.
///
/// No timeout is configured; reqwest's defaults apply.
#[derive(Clone)]
pub struct HttpFetch {
    http: reqwest::Client,
}

impl HttpFetch {
    /// # Errors
    ///
    /// Returns [`FetchError::HttpClientBuild`] if the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let FetchRequest { method, url, mut headers, credentials } = request;
        if credentials == Credentials::Omit {
            headers.remove(header::COOKIE);
            headers.remove(header::AUTHORIZATION);
        }

        let response = self
            .http
            .request(method, url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchResponse { status, headers, body })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use super::*;

    /// Answers every request with the same canned response and records what
    /// it was asked for.
    pub struct StubFetch {
        response: FetchResponse,
        requests: Mutex<Vec<FetchRequest>>,
    }

    impl StubFetch {
        #[must_use]
        pub fn new(response: FetchResponse) -> Self {
            Self { response, requests: Mutex::new(Vec::new()) }
        }

        #[must_use]
        pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
            let mut response = FetchResponse::new(status, body.to_string());
            response
                .headers
                .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Self::new(response)
        }

        #[must_use]
        pub fn raw(status: StatusCode, body: &'static str) -> Self {
            Self::new(FetchResponse::new(status, body))
        }

        pub fn requests(&self) -> Vec<FetchRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Fetch for StubFetch {
        async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
            self.requests.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    /// Fails every request at the transport level.
    pub struct FailingFetch;

    #[async_trait::async_trait]
    impl Fetch for FailingFetch {
        async fn fetch(&self, _request: FetchRequest) -> Result<FetchResponse, FetchError> {
            Err(FetchError::Request("connection refused".into()))
        }
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
