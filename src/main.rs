use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wickwatch::config::Config;
use wickwatch::services::{FeedRegistry, MarketDataClient};
use wickwatch::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wickwatch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting wickwatch on {}:{}", config.host, config.port);
    info!(
        "Market API at {} (timeout {}ms)",
        config.market_api.base_url, config.market_api.timeout_ms
    );

    let client = Arc::new(MarketDataClient::new(&config.market_api)?);
    let registry = FeedRegistry::new(client, config.refresh.clone());

    // Start polling the configured assets
    if config.refresh.auto_refresh {
        for &asset in &config.watch_assets {
            registry.watch(asset);
        }
    } else {
        info!("Auto-refresh disabled, charts load on request");
    }

    let state = AppState {
        config: config.clone(),
        registry: registry.clone(),
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("wickwatch listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    registry.shutdown();

    Ok(())
}
