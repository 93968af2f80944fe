//! Destination string parsing
//!
//! Scheme prefixes are compared literally, in order: `udp://`, `file://`, `ws:`.
//! The first match wins; anything else yields [`Destination::Disabled`].

use std::path::PathBuf;

use contracts::{Destination, SinkConfig, DEFAULT_UDP_PORT};
use tracing::{debug, warn};

const P_UDP: &str = "udp://";
const P_FILE: &str = "file://";
const P_WS: &str = "ws:";

/// Parse a scheme-prefixed destination
pub fn parse_destination(destination: &str) -> Destination {
    if let Some(rest) = destination.strip_prefix(P_UDP) {
        let (host, port) = match rest.split_once(':') {
            Some((host, port)) => (host, parse_port(port)),
            None => (rest, DEFAULT_UDP_PORT),
        };
        Destination::Udp {
            host: host.to_string(),
            port,
        }
    } else if let Some(path) = destination.strip_prefix(P_FILE) {
        if has_wav_suffix(path) {
            warn!(
                path,
                "Output file will be written in raw form without a WAV header"
            );
        }
        Destination::File {
            path: PathBuf::from(path),
        }
    } else if let Some(rest) = destination.strip_prefix(P_WS) {
        Destination::Websocket {
            port: parse_port(rest),
        }
    } else {
        debug!(destination, "No known scheme, sink disabled");
        Destination::Disabled
    }
}

/// Build a UDP destination from an explicit host and port
///
/// Port 0 means the sink is switched off.
pub fn legacy_destination(host: &str, port: u16) -> Destination {
    if port == 0 {
        return Destination::Disabled;
    }
    Destination::Udp {
        host: host.to_string(),
        port,
    }
}

/// Destination selected by a configuration; `destination` wins over the legacy pair
pub fn destination_from_config(config: &SinkConfig) -> Destination {
    match (&config.destination, &config.host) {
        (Some(destination), _) => parse_destination(destination),
        (None, Some(host)) => legacy_destination(host, config.port.unwrap_or(0)),
        (None, None) => Destination::Disabled,
    }
}

/// Leading decimal digits as a port, falling back to the default
fn parse_port(text: &str) -> u16 {
    let trimmed = text.trim_start();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    match trimmed[..digits_end].parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            warn!(
                text,
                default = DEFAULT_UDP_PORT,
                "Unusable port, using default"
            );
            DEFAULT_UDP_PORT
        }
    }
}

/// Case-sensitive `.wav` / `.WAV` suffix on a name longer than the suffix
pub fn has_wav_suffix(path: &str) -> bool {
    path.len() > 4 && (path.ends_with(".wav") || path.ends_with(".WAV"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    /// Collects (level, rendered fields) for every event
    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

    impl<S: Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = FieldText::default();
            event.record(&mut fields);
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), fields.0));
        }
    }

    #[derive(Default)]
    struct FieldText(String);

    impl Visit for FieldText {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.push_str(&format!("{}={:?} ", field.name(), value));
        }
    }

    fn parse_capturing(destination: &str) -> (Destination, Vec<(Level, String)>) {
        let events = CapturedEvents::default();
        let subscriber = Registry::default().with(events.clone());
        let dest = tracing::subscriber::with_default(subscriber, || parse_destination(destination));
        let captured = events.0.lock().unwrap().clone();
        (dest, captured)
    }

    #[test]
    fn test_udp_with_port() {
        assert_eq!(
            parse_destination("udp://127.0.0.1:5000"),
            Destination::Udp {
                host: "127.0.0.1".to_string(),
                port: 5000
            }
        );
    }

    #[test]
    fn test_udp_default_port() {
        assert_eq!(
            parse_destination("udp://localhost"),
            Destination::Udp {
                host: "localhost".to_string(),
                port: 23456
            }
        );
    }

    #[test]
    fn test_udp_port_takes_leading_digits() {
        let dest = parse_destination("udp://host:7000/extra");
        assert_eq!(dest.port(), Some(7000));

        let dest = parse_destination("udp://host:abc");
        assert_eq!(dest.port(), Some(DEFAULT_UDP_PORT));

        let dest = parse_destination("udp://host:70000");
        assert_eq!(dest.port(), Some(DEFAULT_UDP_PORT));
    }

    #[test]
    fn test_file_destination() {
        assert_eq!(
            parse_destination("file:///tmp/x.wav"),
            Destination::File {
                path: PathBuf::from("/tmp/x.wav")
            }
        );
    }

    #[test]
    fn test_wav_file_emits_header_warning() {
        let (dest, events) = parse_capturing("file:///tmp/x.wav");
        assert_eq!(dest.kind(), contracts::BackendKind::File);
        assert!(events
            .iter()
            .any(|(level, text)| *level == Level::WARN && text.contains("/tmp/x.wav")));

        let (_, events) = parse_capturing("file:///tmp/x.raw");
        assert!(events.iter().all(|(level, _)| *level != Level::WARN));
    }

    #[test]
    fn test_wav_suffix_check() {
        assert!(has_wav_suffix("/tmp/x.wav"));
        assert!(has_wav_suffix("a.WAV"));
        assert!(!has_wav_suffix(".wav"));
        assert!(!has_wav_suffix("a.Wav"));
        assert!(!has_wav_suffix("a.raw"));
    }

    #[test]
    fn test_websocket_port() {
        assert_eq!(
            parse_destination("ws:8765"),
            Destination::Websocket { port: 8765 }
        );
        assert_eq!(
            parse_destination("ws://8765"),
            Destination::Websocket {
                port: DEFAULT_UDP_PORT
            }
        );
    }

    #[test]
    fn test_unknown_scheme_is_disabled() {
        assert_eq!(parse_destination("tcp://host:1"), Destination::Disabled);
        assert_eq!(parse_destination(""), Destination::Disabled);
        assert_eq!(parse_destination("UDP://host"), Destination::Disabled);
    }

    #[test]
    fn test_config_selection() {
        let config = SinkConfig {
            host: Some("localhost".to_string()),
            port: Some(5000),
            ..Default::default()
        };
        assert_eq!(destination_from_config(&config).port(), Some(5000));

        let config = SinkConfig {
            host: Some("localhost".to_string()),
            ..Default::default()
        };
        assert_eq!(destination_from_config(&config), Destination::Disabled);
        assert_eq!(
            destination_from_config(&SinkConfig::default()),
            Destination::Disabled
        );
    }

    #[test]
    fn test_legacy_port_zero_disables() {
        assert_eq!(legacy_destination("127.0.0.1", 0), Destination::Disabled);
        assert_eq!(
            legacy_destination("127.0.0.1", 23456),
            Destination::Udp {
                host: "127.0.0.1".to_string(),
                port: 23456
            }
        );
    }
}
