mod config;
mod error;
mod fetch;
mod gate;
mod loader;
mod render;
mod routes;
mod state;

use std::sync::Arc;

use tokio::signal;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::WebConfig::from_env().expect("invalid configuration");
    let port = config.port;
    tracing::info!(
        api_url = %config.api_url,
        gate_policy = ?config.gate_policy,
        status_policy = ?config.status_policy,
        "configuration loaded"
    );

    let fetch = fetch::HttpFetch::new().expect("http client init failed");
    let state = state::AppState::new(config, Arc::new(fetch)).expect("upstream endpoints invalid");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "freudbot-web listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutting down");
}
