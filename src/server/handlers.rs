use super::lifecycle::{RequestEvent, RequestLifecycle};
use crate::{
    Error, Result,
    config::Config,
    inference::{InferenceRunner, ProcessInvoker},
    response::{Reply, ResponseComposer},
    upload::{Clock, UploadAcceptor},
};
use axum::extract::{Multipart, State, multipart::MultipartRejection};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub acceptor: Arc<UploadAcceptor>,
    pub inference: Arc<dyn InferenceRunner>,
    pub composer: Arc<ResponseComposer>,
}

impl AppState {
    pub fn new(
        config: &Config,
        inference: Arc<dyn InferenceRunner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            acceptor: Arc::new(UploadAcceptor::new(
                &config.upload,
                &config.server.public_root,
                clock,
            )),
            inference,
            composer: Arc::new(ResponseComposer::new(
                config.server.public_root.clone(),
                config.inference.processed_prefix.clone(),
            )),
        }
    }

    pub fn with_process_invoker(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self::new(config, Arc::new(ProcessInvoker::new(&config.inference)), clock)
    }
}

pub async fn predict(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Reply> {
    let request_id = Uuid::new_v4();

    async move {
        let mut lifecycle = RequestLifecycle::new();
        let result = handle_upload(&state, multipart, &mut lifecycle).await;

        if !lifecycle.is_terminal() {
            lifecycle.transition(RequestEvent::Aborted)?;
        }
        result
    }
    .instrument(info_span!("predict", %request_id))
    .await
}

async fn handle_upload(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
    lifecycle: &mut RequestLifecycle,
) -> Result<Reply> {
    // A body that is not multipart carries no file either.
    let multipart = multipart.map_err(|rejection| {
        debug!("Rejected non-multipart upload: {}", rejection);
        Error::NoFileUploaded
    })?;
    lifecycle.transition(RequestEvent::BodyReceived)?;

    let descriptor = state.acceptor.accept(multipart).await?;
    lifecycle.transition(RequestEvent::UploadStored)?;

    let outcome = state.inference.run(&descriptor.stored_path).await?;
    lifecycle.transition(RequestEvent::InferenceFinished)?;

    let reply = state.composer.compose(&descriptor, &outcome);
    lifecycle.transition(RequestEvent::ReplyReady)?;

    info!(
        "Responding {} for {}",
        reply.status,
        descriptor.stored_path.display()
    );
    Ok(reply)
}
