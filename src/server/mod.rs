pub mod handlers;
pub mod lifecycle;

use crate::{Result, config::Config, upload::SystemClock};
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use handlers::AppState;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

/// `/predict` plus static files from `public_root`, with `/` serving its index page.
pub fn router(state: AppState, public_root: &Path) -> Router {
    let body_limit = state.acceptor.body_limit();

    Router::new()
        .route(
            "/predict",
            post(handlers::predict).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route_service("/", ServeFile::new(public_root.join("index.html")))
        .fallback_service(ServeDir::new(public_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let app_state = AppState::with_process_invoker(&config, Arc::new(SystemClock));
    app_state.acceptor.ensure_destination().await?;

    info!(
        "Accepting '{}' uploads into {}",
        app_state.acceptor.field_name(),
        config.uploads_path().display()
    );

    let app = router(app_state, &config.server.public_root);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Server is running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
