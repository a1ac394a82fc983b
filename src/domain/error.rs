use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cooldown active: retry in {retry_after_ms} ms")]
    Cooldown { retry_after_ms: i64 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cooldown(retry_after_ms: i64) -> Self {
        Self::Cooldown { retry_after_ms }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is expected control flow rather than a failure
    pub fn is_cooldown(&self) -> bool {
        matches!(self, Self::Cooldown { .. })
    }
}
