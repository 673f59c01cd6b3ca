use axum::http::StatusCode;
use thiserror::Error;

/// Raised when an entry cannot be built or encoded; the save is aborted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidEntry {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown {field}: {value}")]
    UnknownValue { field: &'static str, value: String },
    #[error("invalid time: {0}")]
    InvalidTime(String),
    #[error("duty type {0} requires a time range")]
    MissingTimeRange(String),
    #[error("duty type {0} does not take a time range")]
    UnexpectedTimeRange(String),
    #[error("name must not contain '{0}'")]
    DelimiterInName(char),
    #[error("entry does not match the entry grammar: {0}")]
    Unparsable(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode or decode stored entries: {0}")]
    Json(#[from] serde_json::Error),
    #[error("remote store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote store rejected {operation} with status {status}")]
    Remote {
        operation: &'static str,
        status: u16,
    },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<InvalidEntry> for AppError {
    fn from(err: InvalidEntry) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
