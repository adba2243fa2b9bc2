use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use xray_inference::{
    Error, Result,
    inference::{InferenceOutcome, InferenceRunner},
};

/// Mock inference runner that records every path it is asked to process
#[derive(Debug, Clone)]
pub struct MockInferenceRunner {
    pub outcome: InferenceOutcome,
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
    pub error: Option<String>,
}

impl MockInferenceRunner {
    pub fn new() -> Self {
        Self {
            outcome: InferenceOutcome::Success,
            calls: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_outcome(mut self, outcome: InferenceOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    pub fn get_calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceRunner for MockInferenceRunner {
    async fn run(&self, stored_path: &Path) -> Result<InferenceOutcome> {
        self.calls.lock().unwrap().push(stored_path.to_path_buf());

        if let Some(ref error) = self.error {
            return Err(Error::spawn("mock", error));
        }

        Ok(self.outcome.clone())
    }
}

impl Default for MockInferenceRunner {
    fn default() -> Self {
        Self::new()
    }
}
