use std::sync::Arc;

use anyhow::Context;
use clipstore::app;
use clipstore::config::settings::AppConfig;
use clipstore::infrastructure::db::pool::connect_to_db;
use clipstore::infrastructure::media::FfmpegToolkit;
use clipstore::infrastructure::storage::S3Storage;
use clipstore::modules::video::repository::PgVideoRepository;
use clipstore::state::AppState;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("missing required environment variable")?;
    tokio::fs::create_dir_all(&config.upload_tmp_dir)
        .await
        .with_context(|| format!("couldn't create {}", config.upload_tmp_dir.display()))?;

    let db = connect_to_db(&config.database_url)
        .await
        .context("couldn't connect to database")?;
    let storage = S3Storage::new(
        &config.s3_region,
        config.s3_endpoint.as_deref(),
        &config.s3_access_key,
        &config.s3_secret_key,
    );
    let media = FfmpegToolkit::new(config.ffmpeg_bin.clone(), config.ffprobe_bin.clone());

    let port = config.server_port;
    let state = AppState::new(
        config,
        Arc::new(PgVideoRepository::new(db)),
        Arc::new(storage),
        Arc::new(media),
    );
    let thumbnails = state.thumbnails.clone();
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    thumbnails.clear();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
