mod api;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use passport_core::InMemoryStore;
use passport_scraper::RemoteFetcher;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::{
    api::{build_app, http_page_factory, AppState, CachedPassport},
    middleware::ExtractionQuota,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(passport_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(config.navigation_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?;
    let fetcher = RemoteFetcher::from_config(&config, &client);
    tracing::info!(tiers = ?fetcher.tier_names(), "remote search tiers configured");

    let state = AppState {
        config: Arc::clone(&config),
        passports: Arc::new(InMemoryStore::<Uuid, CachedPassport>::new()),
        fetcher: Arc::new(fetcher),
        pages: http_page_factory(config.user_agent.clone()),
    };
    let app = build_app(
        state,
        ExtractionQuota::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "passport server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
