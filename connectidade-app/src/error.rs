//! Error types for connectidade-app
//!
//! The navigator never returns errors; these cover the CLI edge, where a
//! failed step has to become an exit code.

use thiserror::Error;

use libconnectidade::ConnectError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Service layer error
    #[error("Service error: {0}")]
    Service(#[from] ConnectError),

    /// Writing output failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A navigator action did not complete; carries the toast shown
    #[error("{0}")]
    Application(String),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Service(e) => e.exit_code(),
            AppError::Output(_) | AppError::Serialization(_) | AppError::Application(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
