use crate::{Error, Result};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    AwaitingUpload,
    Uploading,
    Invoking,
    Composing,
    Responded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    BodyReceived,
    UploadStored,
    InferenceFinished,
    ReplyReady,
    Aborted,
}

/// Tracks one `/predict` request from arrival to its single response.
#[derive(Debug)]
pub struct RequestLifecycle {
    state: RequestState,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self {
            state: RequestState::AwaitingUpload,
        }
    }

    pub fn current_state(&self) -> RequestState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == RequestState::Responded
    }

    pub fn transition(&mut self, event: RequestEvent) -> Result<()> {
        use RequestEvent::*;
        use RequestState::*;

        let new_state = match (self.state, event) {
            (AwaitingUpload, BodyReceived) => Uploading,
            (Uploading, UploadStored) => Invoking,
            (Invoking, InferenceFinished) => Composing,
            (Composing, ReplyReady) => Responded,
            (state, Aborted) if state != Responded => Responded,
            _ => {
                warn!(
                    "Invalid request transition from {:?} with event {:?}",
                    self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        debug!(
            "Request state transition: {:?} -> {:?} (event: {:?})",
            self.state, new_state, event
        );
        self.state = new_state;
        Ok(())
    }
}
