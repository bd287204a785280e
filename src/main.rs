use chrono::Local;
use fit_track::{gemini::GeminiClient, load_data, router, AppState, Config};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; insights will use the fallback message");
    }

    let data = load_data(&config.data_path).await;
    info!(
        activities = data.activities.len(),
        path = %config.data_path.display(),
        "loaded data"
    );

    let insight = Arc::new(GeminiClient::from_config(&config));
    let state = AppState::new(
        config.data_path.clone(),
        data,
        Local::now().date_naive(),
        insight,
    );
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
