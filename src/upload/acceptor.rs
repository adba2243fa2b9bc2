use super::{
    UploadDescriptor,
    namer::{Clock, StorageNamer, extension_of},
};
use crate::{Error, Result, config::UploadConfig};
use axum::extract::{Multipart, multipart::Field};
use std::{path::Path, sync::Arc};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, info, warn};

/// Room left in the request body limit for boundaries and part headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub struct UploadAcceptor {
    field_name: String,
    max_file_bytes: usize,
    namer: StorageNamer,
    clock: Arc<dyn Clock>,
}

impl UploadAcceptor {
    pub fn new(config: &UploadConfig, public_root: &Path, clock: Arc<dyn Clock>) -> Self {
        Self {
            field_name: config.field_name.clone(),
            max_file_bytes: config.max_file_bytes,
            namer: StorageNamer::new(public_root.join(&config.uploads_dir)),
            clock,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Ceiling for the whole request body, applied before the file ceiling.
    pub fn body_limit(&self) -> usize {
        self.max_file_bytes + MULTIPART_OVERHEAD_BYTES
    }

    pub async fn ensure_destination(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.namer.destination()).await?;
        Ok(())
    }

    /// Streams the single file part to disk and describes it once it is synced.
    ///
    /// Text parts and parts with an empty file name are skipped. A file part under any other name, or a second
    /// file part, fails the whole upload. Nothing is left on disk when this
    /// returns an error.
    pub async fn accept(&self, mut multipart: Multipart) -> Result<UploadDescriptor> {
        let mut accepted = None;

        if let Err(e) = self.drain(&mut multipart, &mut accepted).await {
            if let Some(descriptor) = accepted.take() {
                discard(&descriptor.stored_path).await;
            }
            return Err(e);
        }

        let descriptor = accepted.ok_or(Error::NoFileUploaded)?;
        info!(
            "Stored upload {} ({} bytes)",
            descriptor.stored_path.display(),
            descriptor.size_bytes
        );
        Ok(descriptor)
    }

    async fn drain(
        &self,
        multipart: &mut Multipart,
        accepted: &mut Option<UploadDescriptor>,
    ) -> Result<()> {
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            // Browsers send an empty filename when no file was chosen.
            let Some(file_name) = field
                .file_name()
                .filter(|file_name| !file_name.is_empty())
                .map(str::to_owned)
            else {
                debug!("Ignoring field without a file: {}", name);
                continue;
            };

            if name != self.field_name || accepted.is_some() {
                return Err(Error::UnexpectedField { field: name });
            }

            *accepted = Some(self.store(field, &file_name).await?);
        }

        Ok(())
    }

    async fn store(&self, mut field: Field<'_>, file_name: &str) -> Result<UploadDescriptor> {
        let extension = extension_of(file_name);
        let path = self
            .namer
            .path_for(&self.field_name, self.clock.now_millis(), &extension);

        debug!("Writing upload {} to {}", file_name, path.display());

        let mut file = File::create(&path).await?;
        match self.write_limited(&mut field, &mut file).await {
            Ok(size_bytes) => Ok(UploadDescriptor::new(path, extension, size_bytes)),
            Err(e) => {
                drop(file);
                discard(&path).await;
                Err(e)
            }
        }
    }

    async fn write_limited(&self, field: &mut Field<'_>, file: &mut File) -> Result<u64> {
        let mut written = 0usize;

        while let Some(chunk) = field.chunk().await? {
            written += chunk.len();
            if written > self.max_file_bytes {
                warn!(
                    "Upload exceeded {} bytes, aborting write",
                    self.max_file_bytes
                );
                return Err(Error::FileTooLarge {
                    limit: self.max_file_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written as u64)
    }
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove partial upload {}: {}", path.display(), e);
    }
}
