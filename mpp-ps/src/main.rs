//! mpp-ps (Prediction Service) - Microplastic concentration estimator
//!
//! Serves a web form and JSON API that estimate microplastic particle
//! concentration in Penang river water from five field readings, using a
//! pre-fitted scaler and pre-trained gradient boosting model.
//!
//! The artifacts load once at startup; if either fails to load the process
//! exits instead of listening.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use mpp_common::config::{
    ArtifactFolderInitializer, ArtifactFolderResolver, MODEL_FILENAME, SCALER_FILENAME,
};
use mpp_common::InferencePipeline;
use mpp_ps::{build_router, AppState};

/// Command-line arguments for mpp-ps
#[derive(Parser, Debug)]
#[command(name = "mpp-ps")]
#[command(about = "Microplastic concentration prediction service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5730", env = "MPP_PS_PORT")]
    port: u16,

    /// Folder containing the fitted scaler and model artifacts
    /// (falls back to MPP_ARTIFACT_FOLDER, the config file, then the
    /// platform default)
    #[arg(short, long)]
    artifact_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The resolver also supplies the log level, so it runs before the
    // tracing subscriber exists and must stay silent.
    let resolver =
        ArtifactFolderResolver::new("prediction-service").with_cli_override(args.artifact_folder);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(resolver.resolve_log_level())),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Microplastic Prediction Service (mpp-ps) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let artifact_folder = resolver.resolve();
    info!("Artifact folder: {}", artifact_folder.display());

    let initializer = ArtifactFolderInitializer::new(artifact_folder);
    initializer.ensure_directory_exists()?;

    // Load both artifacts before binding the port: a server that cannot
    // predict must not start listening.
    let pipeline = match InferencePipeline::initialize(
        &initializer.scaler_path(),
        &initializer.model_path(),
    ) {
        Ok(pipeline) => {
            info!("✓ Loaded inference artifacts");
            pipeline
        }
        Err(e) => {
            error!("Failed to load inference artifacts: {}", e);
            error!(
                "Expected {} and {} in {}",
                SCALER_FILENAME,
                MODEL_FILENAME,
                initializer.artifact_folder().display()
            );
            return Err(e.into());
        }
    };

    let state = AppState::new(Arc::new(pipeline));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("mpp-ps listening on http://{}", addr);
    info!("Prediction form: http://127.0.0.1:{}/", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
