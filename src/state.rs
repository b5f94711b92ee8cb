//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! built once at startup and never mutated: the outbound fetch delegate, the
//! auth gate, one loader per page, and the resolved login URL. Concurrent
//! requests share it without locking.

use std::sync::Arc;

use reqwest::Url;

use crate::config::{ConfigError, WebConfig};
use crate::fetch::Fetch;
use crate::gate::AuthGate;
use crate::loader::{LoaderConfig, UserLoader};

/// Upstream path that starts the OAuth login flow.
pub const UPSTREAM_LOGIN_PATH: &str = "auth/login";

/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebConfig>,
    pub fetch: Arc<dyn Fetch>,
    pub gate: AuthGate,
    /// Loader for the client-rendered app page.
    pub app_loader: Arc<UserLoader>,
    /// Loader for the server-side page; its fetches pass through `gate`.
    pub server_loader: Arc<UserLoader>,
    pub login_url: Arc<Url>,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if an upstream endpoint cannot be derived from
    /// `config.api_url`.
    pub fn new(config: WebConfig, fetch: Arc<dyn Fetch>) -> Result<Self, ConfigError> {
        let app_loader = UserLoader::new(&config, LoaderConfig::app())?;
        let server_loader =
            UserLoader::new(&config, LoaderConfig::server_only().with_status_policy(config.status_policy))?;
        let login_url = config.api_endpoint(UPSTREAM_LOGIN_PATH)?;

        Ok(Self {
            gate: AuthGate::new(config.gate_policy),
            config: Arc::new(config),
            fetch,
            app_loader: Arc::new(app_loader),
            server_loader: Arc::new(server_loader),
            login_url: Arc::new(login_url),
        })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
