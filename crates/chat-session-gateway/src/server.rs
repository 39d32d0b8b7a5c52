//! Gateway server implementation.
//!
//! The messaging bridge connects to a Unix domain socket and streams
//! `messages.upsert` frames. Each textual message in a `notify` batch is
//! forwarded to the bot as one [`InboundEvent`]; replies travel back on the
//! same connection through the event's [`ConnectionSink`].

use crate::{ConnectionSink, GatewayResult};
use chat_protocol_types::{Frame, InboundMessage, UpsertKind};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

/// One inbound message plus the route back to its bridge connection.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub message: InboundMessage,
    pub reply: ConnectionSink,
}

/// Gateway server that listens on a Unix domain socket.
pub struct GatewayServer {
    socket_path: String,
    reply_queue_capacity: usize,
    shutdown_tx: broadcast::Sender<()>,
    next_connection_id: Arc<AtomicU64>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(socket_path: &str, reply_queue_capacity: usize) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            socket_path: socket_path.to_string(),
            reply_queue_capacity: reply_queue_capacity.max(1),
            shutdown_tx,
            next_connection_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Get a shutdown sender (for signal handlers that need to stop the server).
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Trigger shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Whether something is already accepting connections at `socket_path`.
    pub async fn is_listening(socket_path: &Path) -> bool {
        socket_path.exists() && UnixStream::connect(socket_path).await.is_ok()
    }

    /// Start the server and forward inbound events until shutdown.
    pub async fn run(&self, events: mpsc::Sender<InboundEvent>) -> GatewayResult<()> {
        let socket_path = Path::new(&self.socket_path);
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        info!(path = %self.socket_path, "Gateway listening for bridge connections");

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _)) => {
                            let connection_id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
                            let events = events.clone();
                            let capacity = self.reply_queue_capacity;
                            let shutdown = self.shutdown_tx.subscribe();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, connection_id, events, capacity, shutdown).await {
                                    error!(connection_id, error = %e, "Bridge connection error");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Accept error");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Gateway shutting down");
                    break;
                }
            }
        }

        let _ = std::fs::remove_file(&self.socket_path);

        Ok(())
    }
}

/// Handle a single bridge connection.
async fn handle_connection(
    stream: UnixStream,
    connection_id: u64,
    events: mpsc::Sender<InboundEvent>,
    reply_queue_capacity: usize,
    mut shutdown: broadcast::Receiver<()>,
) -> GatewayResult<()> {
    let (reader, writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    let (frame_tx, frame_rx) = mpsc::channel(reply_queue_capacity);
    let sink = ConnectionSink::new(connection_id, frame_tx);
    let writer_task = tokio::spawn(write_frames(writer, frame_rx, connection_id));

    info!(connection_id, "Bridge connected");

    let mut buf = Vec::new();
    loop {
        buf.clear();
        let bytes_read = tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => read?,
            _ = shutdown.recv() => {
                info!(connection_id, "Closing bridge connection for shutdown");
                break;
            }
        };

        if bytes_read == 0 {
            info!(connection_id, "Bridge disconnected");
            break;
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!(connection_id, error = %e, "Skipping frame with invalid UTF-8");
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let frame = match Frame::from_json(trimmed) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(connection_id, error = %e, "Skipping malformed frame");
                continue;
            }
        };

        match frame {
            Frame::MessagesUpsert {
                kind: UpsertKind::Notify,
                messages,
            } => {
                debug!(connection_id, count = messages.len(), "Received message batch");
                for message in messages {
                    let event = InboundEvent {
                        message,
                        reply: sink.clone(),
                    };
                    if events.send(event).await.is_err() {
                        warn!(connection_id, "Dispatcher stopped, closing bridge connection");
                        return Ok(());
                    }
                }
            }
            Frame::MessagesUpsert {
                kind: UpsertKind::Append,
                messages,
            } => {
                debug!(connection_id, count = messages.len(), "Ignoring history sync batch");
            }
            Frame::Ping => {
                let _ = sink.send_frame(Frame::Pong).await;
            }
            Frame::Pong => {}
            Frame::SendText(_) => {
                warn!(connection_id, "Bridge sent an outbound-only frame, ignoring");
            }
        }
    }

    // In-flight events still hold sink clones; the writer drains their
    // replies and exits once the last one is dropped.
    drop(sink);
    let _ = writer_task.await;
    Ok(())
}

/// Serialize queued frames onto the socket, one JSON object per line.
async fn write_frames(
    mut writer: OwnedWriteHalf,
    mut frames: mpsc::Receiver<Frame>,
    connection_id: u64,
) {
    while let Some(frame) = frames.recv().await {
        let json = match frame.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(connection_id, error = %e, "Failed to serialize frame");
                continue;
            }
        };

        if writer.write_all(json.as_bytes()).await.is_err()
            || writer.write_all(b"\n").await.is_err()
            || writer.flush().await.is_err()
        {
            debug!(connection_id, "Bridge write failed, dropping remaining frames");
            break;
        }
    }
}
