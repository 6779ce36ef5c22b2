pub mod ai;
pub mod api;
pub mod config;
mod de;
pub mod media;
pub mod moderation;

use anyhow::Context;
use std::path::PathBuf;

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::var("STYLEBOT_CONFIG").ok().map(PathBuf::from);
    let app_config = config::AppConfig::load(config_path.as_deref());

    if !app_config.has_sightengine_credentials() {
        log::warn!("SIGHTENGINE_USER / SIGHTENGINE_SECRET not set; moderation requests will fail");
    }
    if !app_config.has_openai_key() {
        log::warn!("OPENAI_API_KEY not set; chat requests will fail");
    }

    let bind_addr = app_config.bind_addr.clone();
    let state = api::AppState::from_config(app_config)?;
    let app = api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    log::info!("StyleBot functions listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("StyleBot functions stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
