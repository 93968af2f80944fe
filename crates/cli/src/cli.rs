//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::AudioFlag;
use std::path::PathBuf;

/// Audio Sink - route decoded audio to a UDP endpoint, a raw file or websocket clients
#[derive(Parser, Debug)]
#[command(
    name = "audio-sink",
    author,
    version,
    about = "Route decoded audio bytes to UDP, file or websocket outputs",
    long_about = "Streams raw decoder output to exactly one destination.\n\n\
                  Destinations: udp://host[:port], file://path, ws:port.\n\
                  Audio for channel N goes to port + 2*N on UDP outputs."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "AUDIO_SINK_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (overrides the config file)
    #[arg(long, value_enum, global = true, env = "AUDIO_SINK_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Prometheus metrics port (0 = disabled, overrides the config file)
    #[arg(long, global = true, env = "AUDIO_SINK_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream raw bytes from stdin or a file into the destination
    Stream(StreamArgs),

    /// Send a single control flag
    Flag(FlagArgs),

    /// Parse a destination or configuration and show the selected backend
    Validate(ValidateArgs),
}

impl Commands {
    /// Destination arguments of whichever command was chosen
    pub fn sink_args(&self) -> &SinkArgs {
        match self {
            Self::Stream(args) => &args.sink,
            Self::Flag(args) => &args.sink,
            Self::Validate(args) => &args.sink,
        }
    }
}

/// Destination selection shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SinkArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "AUDIO_SINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Destination: udp://host[:port], file://path or ws:port
    #[arg(short, long, env = "AUDIO_SINK_DEST", conflicts_with = "host")]
    pub dest: Option<String>,

    /// Legacy UDP host (use with --port)
    #[arg(long)]
    pub host: Option<String>,

    /// Legacy UDP port (0 disables output)
    #[arg(long, requires = "host")]
    pub port: Option<u16>,

    /// Sink debug verbosity
    #[arg(long)]
    pub debug: Option<u32>,
}

/// Arguments for the `stream` command
#[derive(Args, Debug, Clone)]
pub struct StreamArgs {
    #[command(flatten)]
    pub sink: SinkArgs,

    /// Input file (defaults to stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Bytes per send
    #[arg(long)]
    pub chunk_bytes: Option<usize>,

    /// Audio channel slot
    #[arg(long)]
    pub slot: Option<u16>,

    /// Flag to send after the last chunk
    #[arg(long, value_enum)]
    pub end_flag: Option<FlagArg>,

    /// Pause between chunks in milliseconds (0 = as fast as input arrives)
    #[arg(long, default_value = "0")]
    pub pace_ms: u64,

    /// Keep the sink open after input ends until Ctrl+C
    #[arg(long)]
    pub hold: bool,
}

/// Arguments for the `flag` command
#[derive(Args, Debug, Clone)]
pub struct FlagArgs {
    #[command(flatten)]
    pub sink: SinkArgs,

    /// Flag to send
    #[arg(value_enum)]
    pub flag: FlagArg,

    /// Audio channel slot
    #[arg(long, default_value = "0")]
    pub slot: u16,
}

/// Arguments for the `validate` command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub sink: SinkArgs,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,

    /// Also open the backend to check resolution and permissions
    #[arg(long)]
    pub open: bool,
}

/// Control flag names accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagArg {
    /// End of call: play out buffered audio
    Drain,
    /// Discard buffered audio
    Drop,
}

impl From<FlagArg> for AudioFlag {
    fn from(flag: FlagArg) -> Self {
        match flag {
            FlagArg::Drain => AudioFlag::Drain,
            FlagArg::Drop => AudioFlag::Drop,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for contracts::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => contracts::LogFormat::Json,
            LogFormat::Pretty => contracts::LogFormat::Pretty,
            LogFormat::Compact => contracts::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stream_args() {
        let cli = Cli::try_parse_from([
            "audio-sink",
            "stream",
            "--dest",
            "udp://127.0.0.1:23456",
            "--slot",
            "1",
            "--end-flag",
            "drain",
        ])
        .unwrap();

        match cli.command {
            Commands::Stream(args) => {
                assert_eq!(args.sink.dest.as_deref(), Some("udp://127.0.0.1:23456"));
                assert_eq!(args.slot, Some(1));
                assert_eq!(args.end_flag, Some(FlagArg::Drain));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_port_requires_host() {
        assert!(Cli::try_parse_from(["audio-sink", "flag", "drop", "--port", "5000"]).is_err());
        assert!(Cli::try_parse_from([
            "audio-sink",
            "flag",
            "drop",
            "--host",
            "localhost",
            "--port",
            "5000"
        ])
        .is_ok());
    }
}
