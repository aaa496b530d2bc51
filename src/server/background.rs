//! Run the server on its own thread.
//!
//! For embedding hosts (notebooks, REPLs, GUI shells) that must keep their
//! main thread. The server gets a dedicated OS thread with a private tokio
//! runtime; the caller gets back the bound address and a handle to stop it.

use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread::JoinHandle;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::{ClassificationService, MimirError, Result};

/// A server running on a background thread.
///
/// Dropping the handle stops the server and joins the thread.
#[derive(Debug)]
pub struct BackgroundServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl BackgroundServer {
    /// Bind `address` and start serving on a new thread.
    ///
    /// Returns once the listener is bound, so requests can be sent as soon
    /// as this returns. Use port 0 to let the OS pick a free port.
    pub fn start(address: &str, service: ClassificationService) -> Result<Self> {
        let address = address.to_string();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<SocketAddr>>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("mimir-http".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.into()));
                        return;
                    }
                };

                runtime.block_on(async move {
                    let listener = match TcpListener::bind(&address).await {
                        Ok(listener) => listener,
                        Err(e) => {
                            let _ = ready_tx.send(Err(e.into()));
                            return;
                        }
                    };
                    let local = match listener.local_addr() {
                        Ok(local) => local,
                        Err(e) => {
                            let _ = ready_tx.send(Err(e.into()));
                            return;
                        }
                    };
                    let _ = ready_tx.send(Ok(local));

                    let shutdown = async move {
                        let _ = shutdown_rx.await;
                    };
                    if let Err(e) = super::serve(listener, service, shutdown).await {
                        error!(error = %e, "background server failed");
                    }
                });
            })?;

        let addr = ready_rx.recv().map_err(|_| {
            MimirError::Configuration("server thread exited before binding".to_string())
        })??;
        info!(%addr, "background server listening");

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for requests, e.g. `http://127.0.0.1:8000`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections, finish in-flight requests and join the
    /// server thread.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            thread.join().map_err(|_| {
                MimirError::Configuration("background server thread panicked".to_string())
            })?;
            info!(addr = %self.addr, "background server stopped");
        }
        Ok(())
    }
}

impl Drop for BackgroundServer {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!(error = %e, "failed to stop background server");
        }
    }
}
