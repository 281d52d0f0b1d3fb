use std::net::SocketAddr;
use std::time::Duration;

use curator_api::{
    api::{create_router, AppState},
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "curator_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Initialize application state
    let state = AppState::from_config(&config);
    state
        .rate_limiter
        .clone()
        .spawn_sweeper(Duration::from_secs(config.rate_limit_window_secs));

    tracing::info!(
        auth_enforced = state.auth.is_enforced(),
        model = %config.gemini_model,
        rate_limit = config.rate_limit_requests,
        window_secs = config.rate_limit_window_secs,
        "Application state initialized"
    );

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server running");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
