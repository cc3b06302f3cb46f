//! In-process transport between the gateway and the engine
//!
//! Commands from concurrent HTTP handlers funnel into one bounded queue
//! drained by a single dedicated thread that owns the `CommandProcessor`.
//! The queue serializes admission, so the engine never sees two commands at
//! once. Replies come back through a correlation map keyed by request id;
//! book updates fan out through one broadcast topic per event.
//!
//! If the queue ever closes underneath the consumer, the process exits:
//! continuing without ordering guarantees is worse than stopping.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc, oneshot};
use uuid::Uuid;

use engine::commands::Command;
use engine::processor::{CommandProcessor, Outcome};
use types::ids::EventId;

use crate::config::Config;
use crate::error::AppError;

struct QueueItem {
    request_id: String,
    command: Command,
}

/// Cloneable handle used by every request handler
#[derive(Clone)]
pub struct ExchangeHandle {
    queue: mpsc::Sender<QueueItem>,
    pending: Arc<DashMap<String, oneshot::Sender<Outcome>>>,
    topics: Arc<DashMap<EventId, broadcast::Sender<serde_json::Value>>>,
    broadcast_capacity: usize,
}

/// Spawn the engine consumer thread and return a handle to it
pub fn start(config: &Config) -> Result<ExchangeHandle, anyhow::Error> {
    let (queue, mut rx) = mpsc::channel::<QueueItem>(config.queue_depth);
    let pending: Arc<DashMap<String, oneshot::Sender<Outcome>>> = Arc::new(DashMap::new());
    let topics: Arc<DashMap<EventId, broadcast::Sender<serde_json::Value>>> =
        Arc::new(DashMap::new());

    let worker_pending = Arc::clone(&pending);
    let worker_topics = Arc::clone(&topics);

    thread::Builder::new()
        .name("exchange-core".to_string())
        .spawn(move || {
            let mut processor = CommandProcessor::new();
            while let Some(item) = rx.blocking_recv() {
                let outcome = processor.handle(&item.request_id, item.command, Utc::now());

                if let Some(update) = &outcome.broadcast {
                    if let Some(topic) = worker_topics.get(&update.event_id) {
                        match serde_json::to_value(&update.book) {
                            // a send error just means no subscriber right now
                            Ok(book) => {
                                let _ = topic.send(book);
                            }
                            Err(err) => tracing::error!(%err, "broadcast encoding failed"),
                        }
                    }
                }

                if let Some((_, waiter)) = worker_pending.remove(&outcome.reply.request_id) {
                    let _ = waiter.send(outcome);
                }
            }
            tracing::error!("command queue closed; stopping the exchange");
            std::process::exit(1);
        })?;

    Ok(ExchangeHandle {
        queue,
        pending,
        topics,
        broadcast_capacity: config.broadcast_capacity,
    })
}

impl ExchangeHandle {
    /// Enqueue one command and await its correlated reply
    pub async fn submit(&self, command: Command) -> Result<Outcome, AppError> {
        let request_id = Uuid::now_v7().to_string();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending.insert(request_id.clone(), reply_tx);

        let item = QueueItem {
            request_id: request_id.clone(),
            command,
        };
        if self.queue.send(item).await.is_err() {
            self.pending.remove(&request_id);
            return Err(AppError::ServiceUnavailable(
                "command queue closed".to_string(),
            ));
        }

        reply_rx
            .await
            .map_err(|_| AppError::ServiceUnavailable("engine dropped the reply".to_string()))
    }

    /// Subscribe to book updates for one event
    pub fn subscribe(&self, event: EventId) -> broadcast::Receiver<serde_json::Value> {
        self.topics
            .entry(event)
            .or_insert_with(|| broadcast::channel(self.broadcast_capacity).0)
            .subscribe()
    }
}
