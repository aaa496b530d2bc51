//! mimird — Mimir daemon.
//!
//! Loads the configured classification model and serves it over HTTP in
//! the foreground until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use mimir::server::config::{Config, ModelConfig};
use mimir::{BuildInfo, ClassificationService, MimirError, OnnxClassifier};

/// Mimir daemon — sentiment classification demo server.
#[derive(Parser)]
#[command(name = "mimird")]
#[command(version)]
#[command(about = "Mimir text classification demo server")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to, overriding the config file.
    #[arg(short, long, env = "MIMIR_ADDRESS")]
    address: Option<String>,

    /// HuggingFace repository of the model, overriding the config file.
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }
    if let Some(model) = args.model {
        config.model.repo_id = model;
    }

    let build = BuildInfo::current();
    info!(version = %build, commit = %build.commit, "mimird starting");

    // No degraded mode: without a model there is nothing to serve.
    let classifier = match load_classifier(config.model.clone()).await {
        Ok(classifier) => classifier,
        Err(e) => {
            error!(error = %e, "failed to load classifier");
            return Err(e.into());
        }
    };

    let service = ClassificationService::new(Arc::new(classifier))
        .with_max_text_chars(config.server.limits.max_text_chars);

    let listener = TcpListener::bind(&config.server.address).await?;
    let addr = listener.local_addr()?;
    info!(url = %format!("http://{addr}"), model = service.model_name(), "mimird listening");
    if let Some(ref url) = config.server.public_url {
        info!(public_url = %url, "public URL");
    }

    mimir::server::serve(listener, service, shutdown_signal()).await?;

    info!("mimird stopped");
    Ok(())
}

/// Load the model off the async runtime; downloads and graph optimisation
/// are slow and blocking.
async fn load_classifier(model: ModelConfig) -> Result<OnnxClassifier, MimirError> {
    let source = model.source()?;
    let device = model.device()?;
    let cache_dir = model.cache_dir();

    tokio::task::spawn_blocking(move || {
        OnnxClassifier::new(&source, device, &cache_dir, model.labels)
    })
    .await
    .map_err(|e| MimirError::ModelLoad(format!("model loading task failed: {e}")))?
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
