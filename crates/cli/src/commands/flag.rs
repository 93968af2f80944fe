//! `flag` command implementation.

use anyhow::Result;
use audio_sink::AudioSink;
use contracts::AudioFlag;
use tracing::{info, warn};

use crate::cli::FlagArgs;
use crate::error::CliError;
use crate::settings;

/// Execute the `flag` command
pub fn run_flag(args: &FlagArgs) -> Result<()> {
    let config = settings::resolve(&args.sink)?;
    let sink = AudioSink::from_config(&config.sink);
    if !sink.is_active() {
        return Err(CliError::sink_inactive(sink.destination().to_string()).into());
    }

    let flag = AudioFlag::from(args.flag);
    let sent = sink.send_audio_flag_channel(flag, args.slot);
    observability::record_flag(sink.backend_kind(), flag, args.slot, sent == 2);

    if sent == 2 {
        info!(
            ?flag,
            slot = args.slot,
            port = ?sink.channel_port(args.slot),
            "Flag sent"
        );
    } else {
        warn!(
            ?flag,
            backend = %sink.backend_kind(),
            "Flag not delivered; only UDP outputs carry flags"
        );
    }
    println!("{sent}");
    Ok(())
}
