use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use scholar_rss::config::AppConfig;
use scholar_rss::core::scholar::fetcher::ScholarFetcher;
use scholar_rss::core::scholar::headers::RotatingBrowserHeaders;
use scholar_rss::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scholar_rss=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let fetcher = ScholarFetcher::new(config.fetch_timeout, Arc::new(RotatingBrowserHeaders))?;
    let state = AppState {
        fetcher: Arc::new(fetcher),
    };
    let app = router(state).layer(TraceLayer::new_for_http());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "scholar-rss listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(error) => {
            tracing::error!(%error, "failed to install shutdown handler");
            std::future::pending::<()>().await;
        }
    }
}
