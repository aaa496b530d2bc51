//! Model files, label sets and device selection.

pub mod device;
pub mod labels;
pub mod source;

pub use device::Device;
pub use labels::{DEFAULT_LABELS, ModelConfig, check_label_count, resolve_labels};
pub use source::{DEFAULT_ONNX_FILE, DEFAULT_REPO_ID, ModelFiles, ModelSource, default_cache_dir};
