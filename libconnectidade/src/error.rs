//! Error types for ConnectIdade

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConnectError>;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing data: {0}")]
    MissingData(String),
}

impl ConnectError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ConnectError::InvalidInput(_) => 3,
            ConnectError::Api(ApiError::Unauthorized(_)) => 2,
            ConnectError::Api(_) => 1,
            ConnectError::Config(_) => 1,
            ConnectError::MissingData(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Failures talking to the learning backend
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timeout)
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request rejected ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Connectivity failure as opposed to an answer from the backend
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Map a non-success HTTP status to the matching variant
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized(body),
            404 => ApiError::NotFound(body),
            _ => ApiError::Status { status, body },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
