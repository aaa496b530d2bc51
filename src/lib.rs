//! Mimir - HTTP demo server for a single text classification model
//!
//! The crate loads one pre-trained sequence-classification model (a
//! DistilBERT sentiment model by default), wraps it in a
//! [`ClassificationService`], and exposes it over HTTP with a small browser
//! page for manual testing.
//!
//! # Serving Example (requires `server` and `local-inference` features)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mimir::{ClassificationService, Device, ModelSource, OnnxClassifier};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let classifier = OnnxClassifier::new(
//!         &ModelSource::default(),
//!         Device::Cpu,
//!         &mimir::model::default_cache_dir(),
//!         None,
//!     )?;
//!     let service = ClassificationService::new(Arc::new(classifier));
//!
//!     let listener = TcpListener::bind("127.0.0.1:8000").await?;
//!     mimir::server::serve(listener, service, std::future::pending()).await
//! }
//! ```
//!
//! # Direct Classification
//!
//! ```rust,ignore
//! use mimir::Classifier;
//!
//! let result = classifier.classify("I love this product")?;
//! assert_eq!(result.label, "POSITIVE");
//! ```

pub mod classifier;
pub mod error;
pub mod model;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use classifier::Classifier;
pub use error::{MimirError, Result};
pub use model::{Device, ModelSource};
pub use service::ClassificationService;
pub use types::Classification;
pub use version::BuildInfo;

#[cfg(feature = "local-inference")]
pub use classifier::OnnxClassifier;
