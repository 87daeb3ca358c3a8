//! Scraper error taxonomy
//!
//! Every failure propagates to the caller of the operation that triggered it;
//! nothing in the crate retries on its own.

use crate::infrastructure::parsing_error::ParsingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    /// Caller passed a value of the wrong shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Numeric parameter outside the accepted window
    #[error("Out of range: {0}")]
    Range(String),

    #[error("Requested resource not found: {url}")]
    NotFound { url: String },

    #[error("Request failed with \"{status}\" status code: {url}")]
    RequestFailed { status: u16, url: String },

    /// The page no longer matches the expected document contract
    #[error(transparent)]
    Parse(#[from] ParsingError),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScraperError {
    /// Whether a caller-driven retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::RequestFailed { status, .. } => *status >= 500,
            Self::InvalidArgument(_)
            | Self::Range(_)
            | Self::NotFound { .. }
            | Self::Parse(_)
            | Self::Config(_) => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ScraperError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        let server_error = ScraperError::RequestFailed {
            status: 503,
            url: "https://play.google.com/store/apps".to_string(),
        };
        let client_error = ScraperError::RequestFailed {
            status: 403,
            url: "https://play.google.com/store/apps".to_string(),
        };
        assert!(server_error.is_retryable());
        assert!(!client_error.is_retryable());
        assert!(!ScraperError::Range("start".to_string()).is_retryable());
        assert!(ScraperError::Transport(anyhow::anyhow!("connection reset")).is_retryable());
    }

    #[test]
    fn test_status_codes() {
        let not_found = ScraperError::NotFound {
            url: "https://play.google.com/store/apps/details?id=x".to_string(),
        };
        assert_eq!(not_found.status(), Some(404));
        assert_eq!(ScraperError::InvalidArgument("q".to_string()).status(), None);
    }
}
