//! Public types for the Mimir API.

mod classification;

pub use classification::{Classification, softmax};
