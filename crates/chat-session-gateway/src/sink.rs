//! Outbound reply seam.

use crate::{GatewayError, GatewayResult};
use async_trait::async_trait;
use chat_protocol_types::{Frame, OutboundText};
use tokio::sync::mpsc;

/// Somewhere a reply can be sent.
///
/// Sending may wait for buffer space on the underlying connection.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_text(&self, reply: OutboundText) -> GatewayResult<()>;
}

/// Reply sink bound to one bridge connection.
///
/// Frames are queued to the connection's writer task, which owns the socket
/// write half.
#[derive(Clone, Debug)]
pub struct ConnectionSink {
    connection_id: u64,
    frames: mpsc::Sender<Frame>,
}

impl ConnectionSink {
    pub(crate) fn new(connection_id: u64, frames: mpsc::Sender<Frame>) -> Self {
        Self {
            connection_id,
            frames,
        }
    }

    /// Gateway-assigned id of the bridge connection.
    pub fn connection_id(&self) -> u64 {
        self.connection_id
    }

    pub(crate) async fn send_frame(&self, frame: Frame) -> GatewayResult<()> {
        self.frames
            .send(frame)
            .await
            .map_err(|_| GatewayError::ConnectionClosed)
    }
}

#[async_trait]
impl ReplySink for ConnectionSink {
    async fn send_text(&self, reply: OutboundText) -> GatewayResult<()> {
        self.send_frame(Frame::SendText(reply)).await
    }
}
