//! Assemble the effective configuration from a config file and CLI overrides.

use anyhow::{Context, Result};
use contracts::RelayConfig;
use tracing::{debug, info};

use crate::cli::SinkArgs;
use crate::error::CliError;

/// Read the config file (if any), apply command-line overrides, then validate
///
/// A destination or host given on the command line replaces whatever the
/// file selected, so the two forms never end up mixed. The file may omit
/// `[sink]` entirely when the command line supplies it.
pub fn resolve(args: &SinkArgs) -> Result<RelayConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            info!(config = %path.display(), "Loading configuration");
            config_loader::ConfigLoader::read(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => RelayConfig::default(),
    };

    if let Some(dest) = &args.dest {
        debug!(dest = %dest, "Overriding destination from CLI");
        config.sink.destination = Some(dest.clone());
        config.sink.host = None;
        config.sink.port = None;
    }
    if let Some(host) = &args.host {
        debug!(host = %host, port = ?args.port, "Overriding legacy host from CLI");
        config.sink.destination = None;
        config.sink.host = Some(host.clone());
        config.sink.port = args.port;
    }
    if let Some(level) = args.debug {
        config.sink.debug = level;
    }

    config_loader::ConfigLoader::validate(&config)
        .map_err(|e| CliError::config_validation(e.to_string()))?;
    Ok(config)
}
