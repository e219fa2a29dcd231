use thiserror::Error;

/// Input rejected before any request leaves the client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("Invalid tracking URL: {0}")]
    InvalidTrackingUrl(String),
}

/// Failures talking to the seller orders backend.
///
/// Every non-2xx response maps to [`ApiError::Status`]; callers do not branch
/// on the code.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.message().to_string())
    }
}
