use crate::response::ResponsePayload;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Unexpected field: {field}")]
    UnexpectedField { field: String },

    #[error("File too large: limit is {limit} bytes")]
    FileTooLarge { limit: usize },

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Failed to spawn inference process {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Invalid state transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn spawn(program: impl Into<String>, reason: impl ToString) -> Self {
        Self::Spawn {
            program: program.into(),
            reason: reason.to_string(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status this error surfaces as when it ends a request.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFileUploaded | Self::UnexpectedField { .. } => StatusCode::BAD_REQUEST,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Multipart(e) => e.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn payload(&self) -> ResponsePayload {
        match self {
            Self::NoFileUploaded => ResponsePayload::error("No file uploaded.", None),
            Self::UnexpectedField { field } => {
                ResponsePayload::error("Unexpected field.", Some(field.clone()))
            }
            Self::FileTooLarge { .. } => {
                ResponsePayload::error("File too large.", Some(self.to_string()))
            }
            Self::Multipart(e) => ResponsePayload::error("Invalid upload.", Some(e.body_text())),
            _ => ResponsePayload::error("Internal server error.", Some(self.to_string())),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(self.payload())).into_response()
    }
}
