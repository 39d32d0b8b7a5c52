//! Routes inbound messages to the catalog service and replies.

use crate::command::{self, Command};
use crate::service::CatalogService;
use chat_protocol_types::{InboundMessage, OutboundText};
use chat_session_gateway::ReplySink;
use tracing::{debug, warn};

/// Stateless routing layer between the gateway and [`CatalogService`].
pub struct Dispatcher {
    service: CatalogService,
    bot_identity: Option<String>,
}

impl Dispatcher {
    /// `bot_identity` is the bot's own account; its messages are never answered.
    pub fn new(service: CatalogService, bot_identity: Option<String>) -> Self {
        Self {
            service,
            bot_identity,
        }
    }

    /// The command a message carries, if it should be answered at all.
    ///
    /// Self-authored messages, messages without text and plain chatter yield
    /// `None`.
    pub fn command_for(&self, message: &InboundMessage) -> Option<Command> {
        let sender = message.sender();
        if message.key.from_me || self.bot_identity.as_deref() == Some(sender) {
            debug!(sender = %sender, "Ignoring own message");
            return None;
        }

        let command = command::parse(message.body()?)?;
        debug!(sender = %sender, mutating = command.is_mutating(), "Command received");
        Some(command)
    }

    /// Execute a command and send its one reply to `sender`.
    pub async fn respond(&self, command: Command, sender: &str, reply: &dyn ReplySink) {
        let text = self.service.execute(command, sender).await;
        if let Err(e) = reply.send_text(OutboundText::new(sender, text)).await {
            warn!(sender = %sender, error = %e, "Failed to send reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render;
    use crate::test_support::RecordingSink;
    use card_catalog_database::{AsyncDatabase, CardCatalog};
    use chat_protocol_types::MessageContent;
    use std::sync::Arc;

    const BOT: &str = "bot@s.whatsapp.net";
    const ALICE: &str = "alice@s.whatsapp.net";

    /// Run a message through the dispatcher and collect what it sends.
    async fn replies_to(dispatcher: &Dispatcher, message: &InboundMessage) -> Vec<OutboundText> {
        let sink = RecordingSink::default();
        if let Some(command) = dispatcher.command_for(message) {
            dispatcher.respond(command, message.sender(), &sink).await;
        }
        sink.sent.into_inner().unwrap()
    }

    async fn dispatcher() -> Dispatcher {
        let catalog = CardCatalog::new(AsyncDatabase::open_in_memory().await.unwrap());
        Dispatcher::new(
            CatalogService::new(Arc::new(catalog)),
            Some(BOT.to_string()),
        )
    }

    #[tokio::test]
    async fn test_command_reply_goes_to_sender() {
        let dispatcher = dispatcher().await;

        let sent = replies_to(&dispatcher, &InboundMessage::text(ALICE, "!NonExistentCard")).await;
        assert_eq!(sent, vec![OutboundText::new(ALICE, render::NOT_FOUND)]);
    }

    #[tokio::test]
    async fn test_ignored_messages_get_no_reply() {
        let dispatcher = dispatcher().await;

        let chatter = InboundMessage::text(ALICE, "oi, tudo bem?");
        assert!(replies_to(&dispatcher, &chatter).await.is_empty());

        let mut own = InboundMessage::text(ALICE, "!Thor");
        own.key.from_me = true;
        assert!(replies_to(&dispatcher, &own).await.is_empty());

        let from_bot = InboundMessage::text(BOT, "!Thor");
        assert!(replies_to(&dispatcher, &from_bot).await.is_empty());

        let mut no_text = InboundMessage::text(ALICE, "");
        no_text.message = Some(MessageContent::default());
        assert!(replies_to(&dispatcher, &no_text).await.is_empty());

        let mut no_payload = InboundMessage::text(ALICE, "");
        no_payload.message = None;
        assert!(replies_to(&dispatcher, &no_payload).await.is_empty());
    }

    #[tokio::test]
    async fn test_respond_sends_exactly_one_reply() {
        let dispatcher = dispatcher().await;
        let sink = RecordingSink::default();

        let command = dispatcher
            .command_for(&InboundMessage::text(ALICE, "!addcarta X Y 1 1 A B C"))
            .unwrap();
        dispatcher.respond(command, ALICE, &sink).await;

        let sent = sink.sent.lock().unwrap().clone();
        assert_eq!(sent, vec![OutboundText::new(ALICE, render::INSERT_DENIED)]);
    }

    #[tokio::test]
    async fn test_closed_sink_is_not_fatal() {
        let dispatcher = dispatcher().await;
        let sink = RecordingSink::closed();

        dispatcher
            .respond(Command::Lookup("Thor".to_string()), ALICE, &sink)
            .await;
        assert!(sink.texts().is_empty());
    }
}
