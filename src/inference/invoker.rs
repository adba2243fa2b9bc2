use super::InferenceOutcome;
use crate::{Error, Result, config::InferenceConfig};
use async_trait::async_trait;
use std::{path::Path, process::Stdio, sync::Arc};
use tokio::{
    io::AsyncReadExt,
    process::{ChildStderr, Command},
    sync::Semaphore,
};
use tracing::{debug, info, warn};

const STDERR_CHUNK_BYTES: usize = 4096;

#[async_trait]
pub trait InferenceRunner: Send + Sync {
    async fn run(&self, stored_path: &Path) -> Result<InferenceOutcome>;
}

/// Runs the external inference program once per upload.
pub struct ProcessInvoker {
    program: String,
    args: Vec<String>,
    permits: Arc<Semaphore>,
}

impl ProcessInvoker {
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            permits: Arc::new(Semaphore::new(config.max_concurrent_jobs)),
        }
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait]
impl InferenceRunner for ProcessInvoker {
    async fn run(&self, stored_path: &Path) -> Result<InferenceOutcome> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Error::internal("Inference semaphore closed"))?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.arg(stored_path);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        debug!(
            "Spawning inference: {} {:?} {}",
            self.program,
            self.args,
            stored_path.display()
        );

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::spawn(self.program.clone(), e))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::internal("Failed to get stderr for inference process"))?;

        // Detached from the request future: a dropped connection leaves the
        // child running to completion.
        let task = tokio::spawn(async move {
            let _permit = permit;
            let captured = collect_stderr(stderr).await?;
            let status = child.wait().await?;
            Ok::<_, Error>((status.code(), captured))
        });

        let (exit_code, captured) = task
            .await
            .map_err(|e| Error::internal(format!("Inference task failed: {}", e)))??;

        let stderr_text = String::from_utf8_lossy(&captured).into_owned();
        let outcome = InferenceOutcome::from_exit(exit_code, stderr_text);

        if outcome.is_success() {
            info!("Inference finished for {}", stored_path.display());
        } else {
            info!("Inference process exited with code {:?}", exit_code);
        }

        Ok(outcome)
    }
}

/// Reads stderr to EOF, keeping every chunk in arrival order.
async fn collect_stderr(mut stderr: ChildStderr) -> Result<Vec<u8>> {
    let mut captured = Vec::new();
    let mut chunk = [0u8; STDERR_CHUNK_BYTES];

    loop {
        let read = stderr.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        warn!(
            "Inference stderr: {}",
            String::from_utf8_lossy(&chunk[..read])
        );
        captured.extend_from_slice(&chunk[..read]);
    }

    Ok(captured)
}
