//! Wire protocol between the bot and the messaging bridge.
//!
//! The bridge owns the messaging session (connection, credentials,
//! encryption). It connects to the bot's gateway socket and both sides
//! exchange newline-delimited JSON [`Frame`]s tagged by `type`.

use serde::{Deserialize, Serialize};

/// One NDJSON line on the gateway socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Frame {
    /// Bridge → bot: a batch of new or synced messages.
    #[serde(rename = "messages.upsert")]
    MessagesUpsert {
        kind: UpsertKind,
        messages: Vec<InboundMessage>,
    },
    /// Bot → bridge: send a text message to a conversation.
    #[serde(rename = "send_text")]
    SendText(OutboundText),
    /// Keepalive request, either direction.
    #[serde(rename = "ping")]
    Ping,
    /// Keepalive answer.
    #[serde(rename = "pong")]
    Pong,
}

impl Frame {
    /// Serialize to a single JSON line (without the trailing newline).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Why the bridge delivered an upsert batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertKind {
    /// Live messages that just arrived.
    Notify,
    /// History sync; never answered.
    Append,
}

/// Message routing metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageKey {
    /// Conversation identity the message belongs to; replies go here.
    pub remote_jid: String,
    /// Set when the bot's own account authored the message.
    #[serde(default)]
    pub from_me: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Text payload wrapped by some clients (replies, link previews).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedTextMessage {
    pub text: String,
}

/// Message payload. Only textual variants are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_text_message: Option<ExtendedTextMessage>,
}

/// A single inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub key: MessageKey,
    /// Absent for protocol/stub messages with no payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageContent>,
}

impl InboundMessage {
    /// Build a plain text message, as a bridge would deliver it.
    pub fn text(remote_jid: &str, body: &str) -> Self {
        Self {
            key: MessageKey {
                remote_jid: remote_jid.to_string(),
                from_me: false,
                id: None,
            },
            message: Some(MessageContent {
                conversation: Some(body.to_string()),
                extended_text_message: None,
            }),
        }
    }

    /// Identity of the conversation this message came from.
    pub fn sender(&self) -> &str {
        &self.key.remote_jid
    }

    /// Textual body: a non-empty `conversation`, else the extended text.
    pub fn body(&self) -> Option<&str> {
        let content = self.message.as_ref()?;
        content
            .conversation
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| content.extended_text_message.as_ref().map(|m| m.text.as_str()))
    }
}

/// A reply addressed to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundText {
    pub to: String,
    pub text: String,
}

impl OutboundText {
    pub fn new(to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            text: text.into(),
        }
    }
}
