//! # Config Loader
//!
//! Reads relay configs from TOML or JSON.
//!
//! A file may leave sections out: the CLI fills the sink from its own flags,
//! so reading and validating are separate steps.
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), contracts::ContractError> {
//! let mut config = ConfigLoader::read(Path::new("relay.toml"))?;
//! config.sink.destination.get_or_insert_with(|| "ws:8765".to_string());
//! ConfigLoader::validate(&config)?;
//! # Ok(())
//! # }
//! ```

mod parser;
mod validator;

pub use contracts::RelayConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Entry points for reading and checking relay configs
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read a config file without validating it
    ///
    /// The format follows the extension (`.toml` / `.json`).
    pub fn read(path: &Path) -> Result<RelayConfig, ContractError> {
        let format = ConfigFormat::for_path(path)?;
        let content = std::fs::read_to_string(path)?;
        parser::decode(&content, format)
    }

    /// Decode config text without validating it
    pub fn parse_str(content: &str, format: ConfigFormat) -> Result<RelayConfig, ContractError> {
        parser::decode(content, format)
    }

    /// Decode and validate a complete config
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<RelayConfig, ContractError> {
        let config = parser::decode(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Check a fully assembled config (file plus overrides)
    pub fn validate(config: &RelayConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }
}
