//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 每种后端的端到端发送测试
//! - Websocket 生命周期与回显测试

#[cfg(test)]
mod contract_tests {
    use contracts::{AudioFlag, BackendKind, Destination, DEFAULT_UDP_PORT};

    #[test]
    fn test_contracts_compile() {
        assert_eq!(DEFAULT_UDP_PORT, 23456);
        assert_eq!(AudioFlag::Drain.code(), 0);
        assert_eq!(Destination::Disabled.kind(), BackendKind::Disabled);
    }
}

#[cfg(test)]
mod udp_tests {
    use std::net::UdpSocket;
    use std::time::Duration;

    use audio_sink::{AudioFlag, AudioSink, BackendKind};

    /// Bind receivers on `base`, `base + 2`, `base + 4`
    fn bind_channel_receivers() -> (u16, Vec<UdpSocket>) {
        // Retry until three even-spaced ports are free together
        for _ in 0..50 {
            let first = UdpSocket::bind("127.0.0.1:0").unwrap();
            let base = first.local_addr().unwrap().port();
            if base > u16::MAX - 4 {
                continue;
            }
            let rest: Vec<_> = [base + 2, base + 4]
                .iter()
                .filter_map(|port| UdpSocket::bind(("127.0.0.1", *port)).ok())
                .collect();
            if rest.len() == 2 {
                let mut sockets = vec![first];
                sockets.extend(rest);
                for socket in &sockets {
                    socket
                        .set_read_timeout(Some(Duration::from_secs(2)))
                        .unwrap();
                }
                return (base, sockets);
            }
        }
        panic!("could not bind channel receivers");
    }

    fn recv(socket: &UdpSocket) -> Vec<u8> {
        let mut buf = [0u8; 2048];
        let (n, _) = socket.recv_from(&mut buf).unwrap();
        buf[..n].to_vec()
    }

    #[test]
    fn test_e2e_channel_slots_map_to_ports() {
        let (base, receivers) = bind_channel_receivers();
        let sink = AudioSink::new(&format!("udp://127.0.0.1:{base}"), 0);
        assert_eq!(sink.backend_kind(), BackendKind::Udp);

        for slot in 0..3u16 {
            let payload = vec![slot as u8; 8];
            assert_eq!(sink.send_audio_channel(&payload, slot), 8);
        }

        for (slot, socket) in receivers.iter().enumerate() {
            assert_eq!(recv(socket), vec![slot as u8; 8]);
        }
    }

    #[test]
    fn test_e2e_flag_on_channel() {
        let (base, receivers) = bind_channel_receivers();
        let sink = AudioSink::with_host_port("localhost", base, 0);

        assert_eq!(sink.send_audio_flag_channel(AudioFlag::Drop, 1), 2);
        assert_eq!(recv(&receivers[1]), vec![0x01, 0x00]);

        assert_eq!(sink.send_audio_flag(AudioFlag::Drain), 2);
        assert_eq!(recv(&receivers[0]), vec![0x00, 0x00]);
    }

    #[test]
    fn test_e2e_send_to_and_send_audio_share_port() {
        let (base, receivers) = bind_channel_receivers();
        let sink = AudioSink::new(&format!("udp://127.0.0.1:{base}"), 0);

        assert_eq!(sink.send_to(b"generic"), 7);
        assert_eq!(sink.send_audio(b"audio"), 5);
        assert_eq!(sink.send_audio(&[]), 0);

        assert_eq!(recv(&receivers[0]), b"generic");
        assert_eq!(recv(&receivers[0]), b"audio");

        let snapshot = sink.metrics().snapshot();
        assert_eq!(snapshot.send_count, 2);
        assert_eq!(snapshot.bytes_sent, 12);
    }
}

#[cfg(test)]
mod file_tests {
    use std::fs;

    use audio_sink::{AudioFlag, AudioSink, BackendKind};
    use tempfile::tempdir;

    #[test]
    fn test_e2e_file_length_excludes_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.wav");
        let sink = AudioSink::new(&format!("file://{}", path.display()), 0);
        assert_eq!(sink.backend_kind(), BackendKind::File);

        let mut expected = Vec::new();
        for i in 0..5u8 {
            let chunk = vec![i; 160];
            assert_eq!(sink.send_audio(&chunk), 160);
            expected.extend_from_slice(&chunk);
            assert_eq!(sink.send_audio_flag(AudioFlag::Drain), 0);
        }
        assert_eq!(sink.send_to(b"tail"), 4);
        expected.extend_from_slice(b"tail");
        assert_eq!(sink.send_audio_channel(b"ch1", 1), 3);
        expected.extend_from_slice(b"ch1");

        assert_eq!(sink.metrics().suppressed_count(), 5);
        drop(sink);

        let written = fs::read(&path).unwrap();
        assert_eq!(written.len(), 5 * 160 + 4 + 3);
        assert_eq!(written, expected);
    }

    #[test]
    fn test_e2e_file_open_failure_disables_sink() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.raw");
        let sink = AudioSink::new(&format!("file://{}", path.display()), 0);

        assert!(!sink.is_active());
        assert_eq!(sink.send_audio(b"abc"), 0);
        assert!(!path.exists());
    }
}

#[cfg(test)]
mod websocket_tests {
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    use audio_sink::{AudioFlag, AudioSink, BackendKind};
    use futures_util::{SinkExt, StreamExt};
    use tokio::time::timeout;
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::Message;

    fn loopback(sink: &AudioSink) -> SocketAddr {
        let port = sink.local_addr().unwrap().port();
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[tokio::test]
    async fn test_e2e_websocket_echo_and_broadcast() {
        let sink = AudioSink::new("ws:0", 0);
        assert_eq!(sink.backend_kind(), BackendKind::Websocket);
        let addr = loopback(&sink);

        let (mut client, _) = connect_async(format!("ws://{addr}")).await.unwrap();

        // Echo keeps the opcode
        client.send(Message::Text("ping".to_string())).await.unwrap();
        let echoed = timeout(Duration::from_secs(2), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(echoed, Message::Text("ping".to_string()));

        client.send(Message::Binary(vec![1, 2, 3])).await.unwrap();
        let echoed = timeout(Duration::from_secs(2), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(echoed, Message::Binary(vec![1, 2, 3]));

        // Client is subscribed once it has been echoed to
        assert_eq!(sink.client_count(), 1);
        assert_eq!(sink.send_audio(b"pcm"), 3);
        assert_eq!(sink.send_audio_flag(AudioFlag::Drain), 0);

        let broadcast = timeout(Duration::from_secs(2), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(broadcast, Message::Binary(b"pcm".to_vec()));

        client.close(None).await.unwrap();
    }

    #[test]
    fn test_e2e_websocket_teardown_joins_server() {
        let sink = AudioSink::new("ws:0", 0);
        assert!(sink.is_active());
        let addr = loopback(&sink);
        assert!(TcpStream::connect(addr).is_ok());

        drop(sink);

        assert!(TcpStream::connect(addr).is_err());
    }

    #[test]
    fn test_e2e_websocket_raw_tcp_peer_is_not_a_client() {
        let sink = AudioSink::new("ws:0", 0);
        let _raw = TcpStream::connect(loopback(&sink)).unwrap();
        std::thread::sleep(Duration::from_millis(200));

        assert_eq!(sink.client_count(), 0);
        assert_eq!(sink.send_audio(b"pcm"), 0);
    }

    #[test]
    fn test_e2e_websocket_without_clients() {
        let sink = AudioSink::new("ws:0", 0);
        assert_eq!(sink.client_count(), 0);
        assert_eq!(sink.send_audio(b"nobody listening"), 0);
    }
}

#[cfg(test)]
mod config_tests {
    use audio_sink::{AudioSink, BackendKind};
    use config_loader::{ConfigFormat, ConfigLoader};

    #[test]
    fn test_e2e_config_to_sink() {
        let content = r#"
[sink]
host = "127.0.0.1"
port = 23456
debug = 1

[stream]
slot = 1
"#;
        let config = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        let sink = AudioSink::from_config(&config.sink);
        assert_eq!(sink.backend_kind(), BackendKind::Udp);
        assert_eq!(sink.debug_level(), 1);
        assert_eq!(sink.channel_port(config.stream.slot), Some(23458));
    }

    #[test]
    fn test_e2e_legacy_port_zero_config() {
        let content = r#"{ "sink": { "host": "127.0.0.1", "port": 0 } }"#;
        let config = ConfigLoader::load_from_str(content, ConfigFormat::Json).unwrap();
        let sink = AudioSink::from_config(&config.sink);
        assert!(!sink.is_active());
        assert_eq!(sink.send_audio(b"x"), 0);
    }
}
