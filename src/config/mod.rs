mod types;

pub use types::*;

use crate::Result;
use std::{env, io::ErrorKind};
use tracing::{debug, warn};

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(config_str) => serde_yaml::from_str::<Config>(&config_str)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Configuration file {} not found, using defaults", config_path);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Ok(port) = env::var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| crate::Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }

    config.validate()?;
    Ok(config)
}
