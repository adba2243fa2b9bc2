use anyhow::Result;
use tracing::info;
use xray_inference::{config, server};

fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Subscriber is not installed yet, so startup failures go to stderr.
    let config = config::load().await.unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());
    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))?,
        )
        .json()
        .init();

    info!("Starting X-ray inference server with log level: {}", log_level);
    info!(
        "Inference command: {} {:?}, at most {} concurrent",
        config.inference.program, config.inference.args, config.inference.max_concurrent_jobs
    );

    server::run(config).await?;

    Ok(())
}
