mod app;
mod auth;
mod config;
mod error;
#[cfg(test)]
mod memory;
mod state;
mod transactions;

use crate::{config::AppConfig, state::AppState};

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "fintrack=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let (host, port) = (config.host.clone(), config.port);
    if config.jwt.ttl_minutes.is_none() {
        tracing::warn!("JWT_TTL_MINUTES not set; issued tokens do not expire");
    }

    let app_state = AppState::init(config).await.map_err(|e| {
        tracing::error!(error = %format!("{e:#}"), "startup failed");
        e
    })?;

    app::serve(app::build_app(app_state), &host, port).await
}
