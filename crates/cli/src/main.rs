//! # Audio Sink CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 目标解析与验证
//! - 原始音频流式发送
//! - 控制标志发送

mod cli;
mod commands;
mod error;
mod settings;
mod signal;
mod stats;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_flag, run_stream, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Audio Sink CLI starting"
    );

    // Execute command
    let result = match &cli.command {
        Commands::Stream(args) => run_stream(args).await,
        Commands::Flag(args) => run_flag(args),
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
///
/// The config file's `[observability]` section is the base; CLI flags win.
fn init_logging(cli: &Cli) -> Result<()> {
    let file_settings = cli
        .command
        .sink_args()
        .config
        .as_deref()
        .and_then(|path| config_loader::ConfigLoader::read(path).ok())
        .map(|config| config.observability)
        .unwrap_or_default();

    let mut config = ObservabilityConfig::from(&file_settings);

    if cli.quiet {
        config.default_log_level = "warn".to_string();
    } else if cli.verbose > 0 {
        config.default_log_level = match cli.verbose {
            1 => "debug",
            _ => "trace",
        }
        .to_string();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format.into();
    }
    if let Some(port) = cli.metrics_port {
        config.metrics_port = (port != 0).then_some(port);
    }

    observability::init_with_config(config)
}
