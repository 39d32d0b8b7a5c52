//! Per-sender ordering.
//!
//! Every sender gets a lane: a bounded queue drained by one task. A sender's
//! commands are answered in arrival order, while different senders proceed
//! concurrently. A lane that stays empty for the idle timeout retires and is
//! recreated on the sender's next command.

use crate::command::Command;
use crate::dispatcher::Dispatcher;
use chat_protocol_types::InboundMessage;
use chat_session_gateway::{InboundEvent, ReplySink};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Commands a lane buffers before further ones from that sender are dropped.
const LANE_CAPACITY: usize = 32;

struct Job {
    command: Command,
    reply: Arc<dyn ReplySink>,
}

/// Fans inbound events out to per-sender lanes.
pub struct LaneRouter {
    dispatcher: Arc<Dispatcher>,
    idle_timeout: Duration,
    lanes: HashMap<String, mpsc::Sender<Job>>,
    next_lane_id: u64,
}

impl LaneRouter {
    pub fn new(dispatcher: Arc<Dispatcher>, idle_timeout: Duration) -> Self {
        Self {
            dispatcher,
            idle_timeout,
            lanes: HashMap::new(),
            next_lane_id: 1,
        }
    }

    /// Number of lanes that have not retired.
    pub fn active_lanes(&self) -> usize {
        self.lanes.values().filter(|lane| !lane.is_closed()).count()
    }

    /// Consume gateway events until the gateway drops its sender.
    pub async fn run(mut self, mut events: mpsc::Receiver<InboundEvent>) {
        while let Some(event) = events.recv().await {
            self.route(event.message, Arc::new(event.reply)).await;
        }
        info!("Event stream closed, dispatcher stopping");
    }

    /// Queue a message on its sender's lane. Messages that need no reply are
    /// dropped here, as are commands for a sender whose lane is full.
    ///
    /// Never waits on a lane, so one busy sender cannot hold up the others.
    pub async fn route(&mut self, message: InboundMessage, reply: Arc<dyn ReplySink>) {
        let Some(command) = self.dispatcher.command_for(&message) else {
            return;
        };
        let sender = message.sender().to_string();
        let mut job = Job { command, reply };

        if let Some(lane) = self.lanes.get(&sender) {
            match lane.try_send(job) {
                Ok(()) => return,
                Err(TrySendError::Full(_)) => {
                    warn!(sender = %sender, capacity = LANE_CAPACITY, "Lane full, dropping command");
                    return;
                }
                // Lane retired between our lookup and the send.
                Err(TrySendError::Closed(returned)) => job = returned,
            }
        }

        let lane = self.open_lane(&sender);
        if lane.try_send(job).is_err() {
            warn!(sender = %sender, "Fresh lane refused a command");
            return;
        }
        self.lanes.insert(sender, lane);
    }

    fn open_lane(&mut self, sender: &str) -> mpsc::Sender<Job> {
        self.lanes.retain(|_, lane| !lane.is_closed());

        let lane_id = self.next_lane_id;
        self.next_lane_id += 1;

        let (tx, rx) = mpsc::channel(LANE_CAPACITY);
        tokio::spawn(drain_lane(
            lane_id,
            sender.to_string(),
            rx,
            self.dispatcher.clone(),
            self.idle_timeout,
        ));
        tx
    }
}

async fn drain_lane(
    lane_id: u64,
    sender: String,
    mut jobs: mpsc::Receiver<Job>,
    dispatcher: Arc<Dispatcher>,
    idle_timeout: Duration,
) {
    debug!(lane_id, sender = %sender, "Lane opened");

    loop {
        match timeout(idle_timeout, jobs.recv()).await {
            Ok(Some(job)) => {
                dispatcher
                    .respond(job.command, &sender, job.reply.as_ref())
                    .await;
            }
            Ok(None) => break,
            Err(_) => {
                // Refuse new work, then finish what was already queued.
                jobs.close();
                while let Ok(job) = jobs.try_recv() {
                    dispatcher
                        .respond(job.command, &sender, job.reply.as_ref())
                        .await;
                }
                break;
            }
        }
    }

    debug!(lane_id, sender = %sender, "Lane retired");
}
