use std::path::PathBuf;

/// A file that has been fully written and synced to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    /// Path the file was written to, including the public root prefix.
    pub stored_path: PathBuf,
    /// Extension with its leading dot, or empty.
    pub original_extension: String,
    pub size_bytes: u64,
}

impl UploadDescriptor {
    pub fn new(stored_path: PathBuf, original_extension: String, size_bytes: u64) -> Self {
        Self {
            stored_path,
            original_extension,
            size_bytes,
        }
    }

    pub fn file_name(&self) -> String {
        self.stored_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
