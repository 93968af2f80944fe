//! `stream` command implementation.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use audio_sink::AudioSink;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{info, warn};

use crate::cli::StreamArgs;
use crate::error::CliError;
use crate::settings;
use crate::signal::shutdown_signal;
use crate::stats::StreamStats;

/// Execute the `stream` command
pub async fn run_stream(args: &StreamArgs) -> Result<()> {
    let mut config = settings::resolve(&args.sink)?;

    // Apply CLI overrides
    if let Some(chunk_bytes) = args.chunk_bytes {
        config.stream.chunk_bytes = chunk_bytes;
    }
    if let Some(slot) = args.slot {
        config.stream.slot = slot;
    }
    if let Some(flag) = args.end_flag {
        config.stream.end_flag = Some(flag.into());
    }
    config_loader::ConfigLoader::validate(&config)
        .map_err(|e| CliError::config_validation(e.to_string()))?;

    let sink = AudioSink::from_config(&config.sink);
    let destination = sink.destination().to_string();
    if !sink.is_active() {
        return Err(CliError::sink_inactive(destination).into());
    }

    let mut input: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let slot = config.stream.slot;
    let backend = sink.backend_kind();
    info!(
        destination = %destination,
        backend = %backend,
        slot,
        chunk_bytes = config.stream.chunk_bytes,
        "Streaming"
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let started = Instant::now();
    let mut stats = StreamStats::default();
    let mut buf = vec![0u8; config.stream.chunk_bytes];

    let interrupted = loop {
        tokio::select! {
            _ = &mut shutdown => break true,
            read = read_chunk(&mut input, &mut buf) => {
                let n = read.map_err(CliError::Input)?;
                if n == 0 {
                    break false;
                }
                let sent = sink.send_audio_channel(&buf[..n], slot);
                observability::record_send(backend, n, sent);
                stats.record(n, sent);

                if args.pace_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(args.pace_ms)).await;
                }
            }
        }
    };

    if interrupted {
        warn!("Received shutdown signal, stopping stream...");
    } else {
        if let Some(flag) = config.stream.end_flag {
            let sent = sink.send_audio_flag_channel(flag, slot);
            observability::record_flag(backend, flag, slot, sent == 2);
            stats.end_flag_sent = sent == 2;
        }
        if args.hold {
            info!(clients = sink.client_count(), "Input finished, holding sink open until Ctrl+C");
            shutdown.await;
        }
    }

    stats.duration = started.elapsed();
    let snapshot = sink.metrics().snapshot();
    observability::record_sink_snapshot(
        backend,
        snapshot.bytes_sent,
        snapshot.short_count,
        snapshot.dropped_count,
    );
    drop(sink);

    info!(
        chunks = stats.chunks,
        bytes_sent = stats.bytes_sent,
        short_sends = stats.short_sends,
        "Stream finished"
    );
    stats.print_summary(&destination);
    Ok(())
}

/// Fill `buf` from `reader`; fewer bytes only at end of input
async fn read_chunk<R>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
