//! Socket gateway between the messaging bridge and the bot.
//!
//! This crate provides:
//! - Unix domain socket server the bridge connects to
//! - NDJSON framing of [`chat_protocol_types::Frame`]s
//! - [`ReplySink`], the outbound seam the dispatcher writes replies to

mod error;
mod server;
mod sink;

pub use chat_protocol_types::{Frame, InboundMessage, OutboundText, UpsertKind};
pub use error::{GatewayError, GatewayResult};
pub use server::{GatewayServer, InboundEvent};
pub use sink::{ConnectionSink, ReplySink};
