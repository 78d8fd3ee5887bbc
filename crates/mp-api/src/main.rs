//! Mining prediction API server.
//!
//! Takes free-text production targets, asks the conversation agent for a
//! control analysis plus ranked recommendations, and returns them parsed.
//!
//! Usage: `mp-api [config.toml]`. Without a file, config comes from `MP_*`
//! environment variables and `GEMINI_API_KEY`.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mp_api::config::ApiConfig;
use mp_api::routes;
use mp_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mp-api starting");

    let config = match std::env::args().nth(1) {
        Some(path) => ApiConfig::from_file(&path)?,
        None => ApiConfig::from_env(),
    };

    let state = AppState::from_config(&config);
    let readiness = state.readiness();
    if !readiness.is_ready() {
        tracing::warn!(
            agent_ready = readiness.agent_ready,
            model_ready = readiness.model_ready,
            "starting degraded, prediction requests will return 503"
        );
    }

    let app = routes::build_router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("mp-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
