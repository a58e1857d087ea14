use std::time::Duration;
use thiserror::Error;
use crate::types::metal::Metal;

#[derive(Error, Debug)]
pub enum Error {
    // Fetch Errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    // Parse Errors
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unrecognized response shape: expected array of records or flat object")]
    UnrecognizedShape,

    #[error("No {0} 999 rate found in response")]
    RateNotFound(Metal),

    // Validation Errors
    #[error("Invalid {metal} rate: {value}")]
    InvalidRate {
        metal: Metal,
        value: f64,
    },

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse grouping used by the feed and by metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Parse,
    Validation,
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Fetch => "fetch",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Config => "config",
        }
    }
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport(_) | Error::Timeout(_) | Error::UpstreamStatus(_) => ErrorCategory::Fetch,
            Error::MalformedPayload(_) | Error::UnrecognizedShape | Error::RateNotFound(_) => {
                ErrorCategory::Parse
            }
            Error::InvalidRate { .. } => ErrorCategory::Validation,
            Error::ConfigError(_) => ErrorCategory::Config,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::MalformedPayload(e.to_string())
        } else if let Some(status) = e.status() {
            Error::UpstreamStatus(status.as_u16())
        } else {
            Error::Transport(e.to_string())
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::ConfigError(e.to_string())
    }
}
