//! HTTP server.
//!
//! This module provides:
//! - The axum router with the demo page, `/predict` and `/health` (`routes`)
//! - Wire types (`dto`) and error-to-response mapping (`error`)
//! - Configuration types (`config`)
//! - A background-thread adapter for hosts that cannot give up their main
//!   thread (`background`)
//!
//! `mimird` runs [`serve`] in the foreground; nothing else in the crate
//! spawns threads.

pub mod background;
pub mod config;
pub mod dto;
pub mod error;
pub mod routes;

use std::future::Future;

use tokio::net::TcpListener;

use crate::{ClassificationService, Result};

pub use background::BackgroundServer;
pub use routes::router;

/// Serve the API on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    service: ClassificationService,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
