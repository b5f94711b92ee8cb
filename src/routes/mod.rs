//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page routes run a user loader before answering; everything else is static
//! or a redirect. When `STATIC_DIR` is set, prerendered assets are served as
//! the fallback so the client bundle lives next to the pages.

pub mod pages;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::redirect_response;
use crate::render;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let mut router = Router::new()
        .route("/", get(pages::home))
        .route("/app", get(pages::app_page))
        .route("/login", get(login))
        .route("/unauthorized", get(unauthorized))
        .route("/healthz", get(healthz))
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router.layer(TraceLayer::new_for_http())
}

/// `GET /login` — hand the visitor to the upstream OAuth entry point.
async fn login(State(state): State<AppState>) -> Response {
    redirect_response(StatusCode::FOUND, state.login_url.as_str())
}

/// `GET /unauthorized` — landing page for the gate's redirect policy.
async fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, render::unauthorized_page()).into_response()
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
