//! Page handlers — one loader run per navigation.

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Html;

use crate::error::PageError;
use crate::loader::LoadEvent;
use crate::render;
use crate::state::AppState;

/// `GET /` — server-side load. The fetch goes through the auth gate and
/// carries no visitor credentials.
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let event = LoadEvent::new(state.fetch.clone()).with_gate(state.gate);
    let data = state.server_loader.load(&event).await?;
    render::page_shell(&data)
}

/// `GET /app` — load on behalf of the browser. Forwards the visitor's cookies
/// and bypasses the gate; a `401` sends the visitor to `/login`.
pub async fn app_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>, PageError> {
    let event = LoadEvent::new(state.fetch.clone()).with_cookies(cookie_header(&headers));
    let data = state.app_loader.load(&event).await?;
    render::page_shell(&data)
}

/// The visitor's `Cookie` header, byte-for-byte. Repeated headers are joined
/// with `"; "` into one value.
fn cookie_header(headers: &HeaderMap) -> Option<HeaderValue> {
    let mut values = headers.get_all(header::COOKIE).iter().filter(|v| !v.is_empty());
    let first = values.next()?;
    let mut joined = first.as_bytes().to_vec();
    for value in values {
        joined.extend_from_slice(b"; ");
        joined.extend_from_slice(value.as_bytes());
    }
    HeaderValue::from_bytes(&joined).ok()
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
