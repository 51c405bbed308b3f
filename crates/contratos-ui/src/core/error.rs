//! Error taxonomy for network, application and storage failures.

use thiserror::Error;

/// Failure surfaced by a backend call or a persistence operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiError {
    /// The request never produced a response (offline, CORS, aborted).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status and no usable body.
    #[error("HTTP {status}")]
    Http {
        /// Response status code.
        status: u16,
    },
    /// The server answered `success: false`.
    #[error("{0}")]
    Application(String),
    /// The body could not be decoded into the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
    /// Local storage was unavailable or held a corrupt blob.
    #[error("storage error: {0}")]
    Storage(String),
}

impl UiError {
    /// True for an HTTP 404 answer.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404 })
    }
}

#[cfg(test)]
mod tests {
    use super::UiError;

    #[test]
    fn only_404_counts_as_not_found() {
        assert!(UiError::Http { status: 404 }.is_not_found());
        assert!(!UiError::Http { status: 500 }.is_not_found());
        assert!(!UiError::Network("offline".into()).is_not_found());
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(UiError::Http { status: 503 }.to_string(), "HTTP 503");
        assert_eq!(
            UiError::Application("sem permissão".into()).to_string(),
            "sem permissão"
        );
    }
}
