//! Error types for SellerLens

/// Result type alias using SellerLens's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SellerLens operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fallback classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration and lexicon errors
    #[error("configuration error: {0}")]
    Config(String),

    /// File/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is fatal at startup
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Yaml(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("overlapping label sets");
        assert_eq!(err.to_string(), "configuration error: overlapping label sets");
        assert!(err.is_config());

        assert!(!Error::Timeout.is_config());
        assert_eq!(Error::Timeout.to_string(), "operation timed out");
    }
}
