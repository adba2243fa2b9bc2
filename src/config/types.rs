use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Directory served statically; uploads and processed images live under it.
    #[serde(default = "default_public_root")]
    pub public_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_field_name")]
    pub field_name: String,
    /// Relative to `server.public_root`.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Leading arguments; the stored upload path is appended last.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
    #[serde(default = "default_processed_prefix")]
    pub processed_prefix: String,
}

impl Config {
    pub fn validate(&self) -> crate::Result<()> {
        if self.upload.field_name.is_empty() {
            return Err(crate::Error::config("upload.field_name must not be empty"));
        }
        if self.upload.max_file_bytes == 0 {
            return Err(crate::Error::config(
                "upload.max_file_bytes must be greater than zero",
            ));
        }
        if self.inference.program.is_empty() {
            return Err(crate::Error::config("inference.program must not be empty"));
        }
        if self.inference.max_concurrent_jobs == 0 {
            return Err(crate::Error::config(
                "inference.max_concurrent_jobs must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Directory uploads are written to.
    pub fn uploads_path(&self) -> PathBuf {
        self.server.public_root.join(&self.upload.uploads_dir)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            public_root: default_public_root(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            field_name: default_field_name(),
            uploads_dir: default_uploads_dir(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
            processed_prefix: default_processed_prefix(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_public_root() -> PathBuf {
    PathBuf::from("public")
}

fn default_field_name() -> String {
    "xrayImage".to_string()
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_file_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_program() -> String {
    "python".to_string()
}

fn default_args() -> Vec<String> {
    vec!["python_inference/inference.py".to_string()]
}

fn default_max_concurrent_jobs() -> usize {
    4
}

fn default_processed_prefix() -> String {
    "processed/".to_string()
}
