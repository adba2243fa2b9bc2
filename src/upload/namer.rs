use chrono::Utc;
use std::path::{Path, PathBuf};

/// Source of wall-clock time for upload naming.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// `{field}-{millis}{ext}`. No collision check is made; two uploads on the
/// same field within the same millisecond share a name.
pub fn stored_file_name(field_name: &str, unix_millis: i64, extension: &str) -> String {
    format!("{}-{}{}", field_name, unix_millis, extension)
}

/// Extension of a client-supplied file name, with its leading dot.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

pub struct StorageNamer {
    destination: PathBuf,
}

impl StorageNamer {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn path_for(&self, field_name: &str, unix_millis: i64, extension: &str) -> PathBuf {
        self.destination
            .join(stored_file_name(field_name, unix_millis, extension))
    }
}
