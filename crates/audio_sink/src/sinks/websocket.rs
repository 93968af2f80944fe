//! WebsocketTransport - debug/monitor tap serving connected websocket clients
//!
//! The server runs a single-threaded tokio runtime on its own OS thread. The
//! transport owns that thread and joins it on close, after the listener and
//! the event loop have been stopped.
//!
//! Audio bytes are broadcast to every client as binary messages. Inbound
//! messages go to a [`WsEventHandler`]; the default [`EchoHandler`] returns
//! them to the sender unchanged.

use std::net::{Ipv4Addr, SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use bytes::Bytes;
use contracts::{AudioTransport, BackendKind, ContractError};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, instrument, trace, warn};

/// Pending audio messages per client before the oldest are skipped
const BROADCAST_CAPACITY: usize = 256;

/// Peers that have not completed the upgrade by then are dropped
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause after a failed accept (e.g. descriptor exhaustion)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Connection lifecycle hooks
pub trait WsEventHandler: Send + Sync + 'static {
    /// Handshake completed
    fn on_open(&self, peer: SocketAddr);

    /// Connection ended normally
    fn on_close(&self, peer: SocketAddr);

    /// Handshake or transport failure on one connection
    fn on_fail(&self, peer: SocketAddr, error: &str);

    /// Inbound text or binary message; the returned message is sent back to `peer`
    fn on_message(&self, peer: SocketAddr, msg: Message) -> Option<Message>;
}

/// Logs lifecycle events and echoes every message back verbatim
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

impl WsEventHandler for EchoHandler {
    fn on_open(&self, peer: SocketAddr) {
        info!(sink = "websocket", %peer, "Websocket connection opened");
    }

    fn on_close(&self, peer: SocketAddr) {
        info!(sink = "websocket", %peer, "Websocket connection closed");
    }

    fn on_fail(&self, peer: SocketAddr, error: &str) {
        warn!(sink = "websocket", %peer, error, "Websocket connection failed");
    }

    fn on_message(&self, _peer: SocketAddr, msg: Message) -> Option<Message> {
        Some(msg)
    }
}

/// Sink that serves audio to websocket clients
pub struct WebsocketTransport {
    local_addr: SocketAddr,
    audio_tx: broadcast::Sender<Bytes>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
    debug: u32,
}

impl WebsocketTransport {
    /// Start an echoing server on `port` (0 picks a free port)
    pub fn start(port: u16, debug: u32) -> Result<Self, ContractError> {
        Self::start_with_handler(port, debug, Arc::new(EchoHandler))
    }

    /// Start a server with custom lifecycle hooks
    #[instrument(name = "websocket_transport_start", skip(debug, handler))]
    pub fn start_with_handler(
        port: u16,
        debug: u32,
        handler: Arc<dyn WsEventHandler>,
    ) -> Result<Self, ContractError> {
        let open_err = |e: std::io::Error| ContractError::sink_open("websocket", e.to_string());

        // Bind here so a busy port disables the sink at construction time
        let listener = StdTcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).map_err(open_err)?;
        listener.set_nonblocking(true).map_err(open_err)?;
        let local_addr = listener.local_addr().map_err(open_err)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(open_err)?;

        let (audio_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let server_tx = audio_tx.clone();
        let thread = std::thread::Builder::new()
            .name(format!("ws-sink-{}", local_addr.port()))
            .spawn(move || {
                runtime.block_on(serve(listener, server_tx, handler, shutdown_rx));
                // Dropping the runtime cancels every connection task
                drop(runtime);
            })
            .map_err(open_err)?;

        info!(sink = "websocket", port = local_addr.port(), "Started websocket server");

        Ok(Self {
            local_addr,
            audio_tx,
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
            debug,
        })
    }

    /// Address the server listens on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Clients that completed the websocket handshake and receive audio
    pub fn client_count(&self) -> usize {
        self.audio_tx.receiver_count()
    }

    /// Whether the server thread is still owned by this transport
    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }
}

impl AudioTransport for WebsocketTransport {
    fn kind(&self) -> BackendKind {
        BackendKind::Websocket
    }

    fn accepts_control(&self) -> bool {
        false
    }

    fn send(&self, buf: &[u8], _port: u16, is_ctrl: bool) -> usize {
        if buf.is_empty() || is_ctrl || self.thread.is_none() {
            return 0;
        }
        match self.audio_tx.send(Bytes::copy_from_slice(buf)) {
            Ok(clients) => {
                if self.debug >= 10 {
                    trace!(sink = "websocket", clients, bytes = buf.len(), "Broadcast");
                }
                buf.len()
            }
            // No subscribers
            Err(_) => 0,
        }
    }

    fn close(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let port = self.local_addr.port();
        info!(sink = "websocket", port, "Shutting down websocket server");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if thread.join().is_err() {
            error!(sink = "websocket", port, "Websocket server thread panicked");
        }

        info!(sink = "websocket", port, "Websocket server stopped");
    }
}

impl Drop for WebsocketTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Accept loop, runs until the shutdown signal fires or its sender is dropped
async fn serve(
    listener: StdTcpListener,
    audio_tx: broadcast::Sender<Bytes>,
    handler: Arc<dyn WsEventHandler>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let listener = match TcpListener::from_std(listener) {
        Ok(listener) => listener,
        Err(e) => {
            error!(sink = "websocket", error = %e, "Cannot register listener");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tokio::spawn(handle_connection(
                        stream,
                        peer,
                        audio_tx.clone(),
                        Arc::clone(&handler),
                    ));
                }
                Err(e) => {
                    warn!(sink = "websocket", error = %e, "Accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
        }
    }

    drop(listener);
    debug!(sink = "websocket", "Stopped listening");
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    audio_tx: broadcast::Sender<Bytes>,
    handler: Arc<dyn WsEventHandler>,
) {
    let handshake = tokio_tungstenite::accept_async(stream);
    let ws_stream = match tokio::time::timeout(HANDSHAKE_TIMEOUT, handshake).await {
        Ok(Ok(ws)) => ws,
        Ok(Err(e)) => {
            handler.on_fail(peer, &e.to_string());
            return;
        }
        Err(_) => {
            handler.on_fail(peer, "handshake timed out");
            return;
        }
    };
    handler.on_open(peer);

    // Only upgraded peers count as audio clients
    let mut audio_rx = audio_tx.subscribe();
    drop(audio_tx);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    loop {
        tokio::select! {
            inbound = ws_receiver.next() => match inbound {
                Some(Ok(msg @ (Message::Text(_) | Message::Binary(_)))) => {
                    if let Some(reply) = handler.on_message(peer, msg) {
                        if let Err(e) = ws_sender.send(reply).await {
                            handler.on_fail(peer, &e.to_string());
                            return;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Ping/pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    handler.on_fail(peer, &e.to_string());
                    return;
                }
            },
            outbound = audio_rx.recv() => match outbound {
                Ok(data) => {
                    if let Err(e) = ws_sender.send(Message::Binary(data.to_vec())).await {
                        handler.on_fail(peer, &e.to_string());
                        return;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(sink = "websocket", %peer, skipped, "Client lagging, audio skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    handler.on_close(peer);
}
