use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use limbr_admin::config;
use limbr_admin::database::Repositories;
use limbr_admin::handlers::{self, AppState};
use limbr_admin::services::AccountService;
use limbr_admin::ui::messages;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, LIMBR_STORAGE, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let config = config::config();
    info!("Starting Limbr admin in {:?} mode", config.environment);

    let repositories = Repositories::open(&config.database)
        .await
        .context("failed to open storage")?;

    let accounts = AccountService::new(repositories.users.clone());
    if accounts.ensure_bootstrap_admin(&config.security).await? && limbr_admin::is_development!() {
        warn!("Bootstrap administrator uses development credentials");
    }

    let state = AppState::new(repositories, messages().clone(), config);
    let app = handlers::router(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Limbr admin listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
