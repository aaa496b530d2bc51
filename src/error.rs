//! Mimir error types

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Request errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Scoring errors
    #[error("inference failed: {0}")]
    Inference(String),

    // Startup errors
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MimirError {
    /// Whether the caller is at fault.
    ///
    /// Client errors are reported back verbatim; everything else is hidden
    /// behind a generic message at the HTTP boundary.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_input_is_a_client_error() {
        assert!(MimirError::InvalidInput("empty".into()).is_client_error());
        assert!(!MimirError::Inference("boom".into()).is_client_error());
        assert!(!MimirError::ModelLoad("missing".into()).is_client_error());
    }
}
