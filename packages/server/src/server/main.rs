// Main entry point for API server

use anyhow::{Context, Result};
use server_core::{server::build_app, Config};
use source_curation::CurationPipeline;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,source_curation=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biography Source Curation API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        model = %config.curation.model,
        tracking_path = %config.curation.tracking_path.display(),
        "Configuration loaded"
    );

    // Build pipeline and application
    let pipeline =
        CurationPipeline::from_config(&config.curation).context("Failed to build pipeline")?;
    tracing::info!(cases = pipeline.feedback().len(), "Feedback store loaded");
    let app = build_app(pipeline);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
