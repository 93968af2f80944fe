//! `validate` command implementation.

use anyhow::{Context, Result};
use audio_sink::{destination_from_config, has_wav_suffix, AudioSink};
use contracts::{BackendKind, Destination};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::settings;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<DestinationSummary>,
}

#[derive(Serialize)]
struct DestinationSummary {
    destination: String,
    backend: BackendKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    /// Set when `--open` was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    opened: Option<bool>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!("Validating destination");

    let result = validate_destination(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Destination validation failed")
    }
}

fn validate_destination(args: &ValidateArgs) -> ValidationResult {
    let config = match settings::resolve(&args.sink) {
        Ok(config) => config,
        Err(e) => {
            return ValidationResult {
                valid: false,
                error: Some(format!("{e:#}")),
                warnings: None,
                summary: None,
            }
        }
    };

    let destination = destination_from_config(&config.sink);
    let warnings = collect_warnings(&destination);

    let opened = args.open.then(|| {
        let sink = AudioSink::activate(destination.clone(), config.sink.debug);
        sink.is_active()
    });

    let valid = destination.kind() != BackendKind::Disabled && opened != Some(false);
    let error = if destination.kind() == BackendKind::Disabled {
        Some("destination selects no backend".to_string())
    } else if opened == Some(false) {
        Some("backend could not be opened".to_string())
    } else {
        None
    };

    ValidationResult {
        valid,
        error,
        warnings: if warnings.is_empty() {
            None
        } else {
            Some(warnings)
        },
        summary: Some(DestinationSummary {
            destination: destination.to_string(),
            backend: destination.kind(),
            port: destination.port(),
            opened,
        }),
    }
}

/// Collect destination warnings (non-fatal issues)
fn collect_warnings(destination: &Destination) -> Vec<String> {
    let mut warnings = Vec::new();

    match destination {
        Destination::File { path } => {
            if has_wav_suffix(&path.to_string_lossy()) {
                warnings.push("output is raw PCM; no WAV header will be written".to_string());
            }
            warnings.push("file outputs never carry control flags".to_string());
        }
        Destination::Websocket { .. } => {
            warnings.push("websocket output is a monitor tap; flags are not broadcast".to_string());
        }
        Destination::Udp { port, .. } if *port < 1024 => {
            warnings.push(format!("port {port} is a privileged port"));
        }
        _ => {}
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Destination is valid");
    } else {
        println!("✗ Destination is invalid");
    }

    if let Some(ref summary) = result.summary {
        println!("\n  Destination: {}", summary.destination);
        println!("  Backend: {}", summary.backend);
        if let Some(port) = summary.port {
            println!("  Port: {}", port);
        }
        if let Some(opened) = summary.opened {
            println!("  Opened: {}", opened);
        }
    }

    if let Some(ref error) = result.error {
        println!("\n  Error: {}", error);
    }

    if let Some(ref warnings) = result.warnings {
        println!("\n  Warnings:");
        for warning in warnings {
            println!("    - {}", warning);
        }
    }
}
