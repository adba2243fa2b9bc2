use crate::{
    inference::{InferenceOutcome, UNKNOWN_FAILURE_DETAILS},
    upload::UploadDescriptor,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

pub const PROCESSING_FAILED: &str = "Failed to process the image.";

/// Body of every `/predict` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Ok {
        original: String,
        processed: String,
    },
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl ResponsePayload {
    pub fn error(error: impl Into<String>, details: Option<String>) -> Self {
        Self::Error {
            error: error.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub payload: ResponsePayload,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.payload)).into_response()
    }
}

/// Maps a stored upload and its inference outcome onto the public contract.
pub struct ResponseComposer {
    public_root: PathBuf,
    processed_prefix: String,
}

impl ResponseComposer {
    pub fn new(public_root: impl Into<PathBuf>, processed_prefix: impl Into<String>) -> Self {
        Self {
            public_root: public_root.into(),
            processed_prefix: processed_prefix.into(),
        }
    }

    pub fn compose(&self, descriptor: &UploadDescriptor, outcome: &InferenceOutcome) -> Reply {
        match outcome {
            InferenceOutcome::Failure { stderr_text, .. } => {
                let details = if stderr_text.is_empty() {
                    UNKNOWN_FAILURE_DETAILS.to_string()
                } else {
                    stderr_text.clone()
                };
                Reply {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    payload: ResponsePayload::error(PROCESSING_FAILED, Some(details)),
                }
            }
            InferenceOutcome::Success => Reply {
                status: StatusCode::OK,
                payload: ResponsePayload::Ok {
                    original: public_relative(&descriptor.stored_path, &self.public_root),
                    processed: format!("{}{}", self.processed_prefix, descriptor.file_name()),
                },
            },
        }
    }
}

/// `path` below `public_root`, joined with forward slashes whatever the host
/// separator. Backslashes inside components are treated as separators too.
fn public_relative(path: &Path, public_root: &Path) -> String {
    let relative = path.strip_prefix(public_root).unwrap_or(path);

    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().replace('\\', "/")),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
