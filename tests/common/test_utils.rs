use super::mocks::MockInferenceRunner;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use xray_inference::{
    config::{Config, InferenceConfig, LogsConfig, ServerConfig, UploadConfig},
    server::{self, handlers::AppState},
    upload::FixedClock,
};

pub const BOUNDARY: &str = "xray-test-boundary";
pub const FIXED_MILLIS: i64 = 1_700_000_000_000;
pub const INDEX_HTML: &str = "<!doctype html><title>X-ray upload</title>";

/// Create a test configuration rooted at the given public directory
pub fn create_test_config(public_root: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 7000,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
            public_root: public_root.to_path_buf(),
        },
        upload: UploadConfig {
            field_name: "xrayImage".to_string(),
            uploads_dir: PathBuf::from("uploads"),
            max_file_bytes: 5 * 1024 * 1024,
        },
        inference: InferenceConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "exit 0".to_string(), "inference".to_string()],
            max_concurrent_jobs: 2,
            processed_prefix: "processed/".to_string(),
        },
    }
}

/// Create a public root with an index page and an uploads directory
pub fn create_public_root() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    std::fs::create_dir_all(temp_dir.path().join("uploads")).unwrap();
    std::fs::write(temp_dir.path().join("index.html"), INDEX_HTML).unwrap();
    temp_dir
}

pub fn create_test_app(runner: MockInferenceRunner) -> (Router, TempDir) {
    let public_root = create_public_root();
    let config = create_test_config(public_root.path());

    let state = AppState::new(
        &config,
        Arc::new(runner),
        Arc::new(FixedClock(FIXED_MILLIS)),
    );

    (server::router(state, public_root.path()), public_root)
}

/// A multipart part: field name, optional file name, content.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, file_name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            data: value.as_bytes(),
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn predict_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// File names currently in the uploads directory, sorted
pub fn list_uploads(public_root: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(public_root.join("uploads"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Deterministic pseudo-image bytes of the given size
pub fn fake_image(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}
