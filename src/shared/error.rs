use thiserror::Error;
use serde::Serialize;

#[derive(Error, Debug, Serialize)]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    /// Transport-level failure (connect, DNS, body read). Never retried.
    #[error("Network Error: {0}")]
    Network(String),

    /// Terminal non-2xx response. Displays as the server's message, or
    /// `<endpoint> failed: <status>` when the body carried none.
    #[error("{message}")]
    Request {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Decode Error: {0}")]
    Decode(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Config Error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status of a terminal request failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for surfacing in UI state.
    ///
    /// Validation errors show their bare text, the rest use `Display`.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
