use async_trait::async_trait;
use card_catalog_database::{CardFields, CardRecord, RecordStore, StoreError, StoreResult};
use chat_protocol_types::OutboundText;
use chat_session_gateway::{GatewayError, GatewayResult, ReplySink};
use std::sync::Mutex;
use tokio::sync::Semaphore;

fn fault() -> StoreError {
    StoreError::Connection("database is locked".to_string())
}

/// Store whose every operation faults.
pub struct FailingStore;

#[async_trait]
impl RecordStore for FailingStore {
    async fn get(&self, _name_pt: &str) -> StoreResult<Option<CardRecord>> {
        Err(fault())
    }

    async fn get_by_either(&self, _name: &str) -> StoreResult<Option<CardRecord>> {
        Err(fault())
    }

    async fn insert(&self, _fields: CardFields) -> StoreResult<CardRecord> {
        Err(fault())
    }

    async fn update(&self, _fields: CardFields) -> StoreResult<CardRecord> {
        Err(fault())
    }

    async fn is_authorized(&self, _identity: &str) -> StoreResult<bool> {
        Err(fault())
    }
}

/// Store that authorizes everyone but faults on writes.
pub struct BrokenWritesStore;

#[async_trait]
impl RecordStore for BrokenWritesStore {
    async fn get(&self, _name_pt: &str) -> StoreResult<Option<CardRecord>> {
        Ok(None)
    }

    async fn get_by_either(&self, _name: &str) -> StoreResult<Option<CardRecord>> {
        Ok(None)
    }

    async fn insert(&self, _fields: CardFields) -> StoreResult<CardRecord> {
        Err(fault())
    }

    async fn update(&self, _fields: CardFields) -> StoreResult<CardRecord> {
        Err(fault())
    }

    async fn is_authorized(&self, _identity: &str) -> StoreResult<bool> {
        Ok(true)
    }
}

/// Sink that records replies in send order.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<OutboundText>>,
    pub closed: bool,
}

impl RecordingSink {
    pub fn closed() -> Self {
        Self {
            sent: Mutex::default(),
            closed: true,
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn send_text(&self, reply: OutboundText) -> GatewayResult<()> {
        if self.closed {
            return Err(GatewayError::ConnectionClosed);
        }
        self.sent.lock().unwrap().push(reply);
        Ok(())
    }
}

/// Sink that holds every reply until [`HeldSink::release`] is called.
pub struct HeldSink {
    pub inner: RecordingSink,
    gate: Semaphore,
}

impl Default for HeldSink {
    fn default() -> Self {
        Self {
            inner: RecordingSink::default(),
            gate: Semaphore::new(0),
        }
    }
}

impl HeldSink {
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl ReplySink for HeldSink {
    async fn send_text(&self, reply: OutboundText) -> GatewayResult<()> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| GatewayError::ConnectionClosed)?;
        self.inner.send_text(reply).await
    }
}
