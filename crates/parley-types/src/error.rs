use thiserror::Error;

/// Errors raised while assembling startup configuration.
///
/// These are fatal: the process refuses to start without its credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable '{0}'")]
    MissingEnv(String),

    #[error("invalid configuration value for '{name}': {message}")]
    Invalid { name: String, message: String },
}

/// Errors raised while loading static data documents (corpus, menu, FAQ).
///
/// Fatal at startup for the corpus and menu; for a single FAQ category the
/// error is recovered and surfaced to the visitor as a chat message.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data document missing: {0}")]
    Missing(String),

    #[error("data document malformed: {name}: {message}")]
    Malformed { name: String, message: String },
}

/// Errors from the external text-generation service.
///
/// Never reaches the visitor: the resilient wrapper substitutes a fixed
/// apology and logs the failure.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request timed out")]
    Timeout,

    #[error("generation service rate limited")]
    RateLimited,

    #[error("generation service authentication failed")]
    AuthenticationFailed,

    #[error("generation provider error: {message}")]
    Provider { message: String },

    #[error("generation response malformed: {0}")]
    Deserialization(String),
}

/// Errors from the remote chat store.
///
/// Never reaches the visitor: the fallback store absorbs them per call or
/// per session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store deadline exceeded")]
    DeadlineExceeded,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store payload malformed: {0}")]
    Serialization(String),

    #[error("session not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::MissingEnv("PARLEY_STORE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "missing required environment variable 'PARLEY_STORE_URL'"
        );
    }

    #[test]
    fn data_error_display() {
        let err = DataError::Malformed {
            name: "faq/billing.json".to_string(),
            message: "expected array".to_string(),
        };
        assert!(err.to_string().contains("faq/billing.json"));
        assert!(err.to_string().contains("expected array"));
    }

    #[test]
    fn store_error_display() {
        assert_eq!(
            StoreError::DeadlineExceeded.to_string(),
            "store deadline exceeded"
        );
    }
}
