//! # Event Publisher
//!
//! Sending half of the bus plus the listener registry that tracks, per topic,
//! how many live `Subscription`s will see an event. The node reads the
//! registry to tell whether the oracle relay and demo players are attached.

use crate::events::{EventFilter, EventTopic, RaffleEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Publish hook the raffle service calls after each successful mutation.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Broadcast `event`; returns how many receivers it reached.
    async fn publish(&self, event: RaffleEvent) -> usize;

    fn events_published(&self) -> u64;
}

/// Live subscription count per concrete topic.
#[derive(Debug, Default)]
pub(crate) struct TopicListeners {
    counts: Mutex<HashMap<EventTopic, usize>>,
}

impl TopicListeners {
    /// Register a subscription on `topics`.
    pub(crate) fn attach(&self, topics: &[EventTopic]) {
        let mut counts = self.counts.lock();
        for topic in topics {
            *counts.entry(*topic).or_default() += 1;
        }
    }

    /// Undo a prior [`attach`](Self::attach) with the same topics.
    pub(crate) fn detach(&self, topics: &[EventTopic]) {
        let mut counts = self.counts.lock();
        for topic in topics {
            if let Some(count) = counts.get_mut(topic) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    counts.remove(topic);
                }
            }
        }
    }

    pub(crate) fn count(&self, topic: EventTopic) -> usize {
        if topic == EventTopic::All {
            return self.counts.lock().values().copied().max().unwrap_or(0);
        }
        self.counts.lock().get(&topic).copied().unwrap_or(0)
    }
}

/// Single-process bus on `tokio::sync::broadcast`.
///
/// Every receiver sees every event; filtering happens on the receiving side.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<RaffleEvent>,
    listeners: Arc<TopicListeners>,
    published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// `capacity` events are buffered before the slowest receiver lags.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            listeners: Arc::new(TopicListeners::default()),
            published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Counted subscription; shows up in [`listeners`](Self::listeners)
    /// until dropped.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let topics = filter.listened_topics();
        self.listeners.attach(&topics);
        debug!(topics = ?topics, rounds = ?filter.rounds, "Subscription opened");

        Subscription::new(self.sender.subscribe(), filter, self.listeners.clone(), topics)
    }

    /// Uncounted `Stream` over matching events.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Live subscriptions that would receive an event on `topic`.
    ///
    /// `EventTopic::All` reports the busiest topic.
    #[must_use]
    pub fn listeners(&self, topic: EventTopic) -> usize {
        self.listeners.count(topic)
    }

    /// Raw receivers on the channel, streams included.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: RaffleEvent) -> usize {
        let topic = event.topic();
        let round = event.round();
        let listeners = self.listeners.count(topic);
        self.published.fetch_add(1, Ordering::Relaxed);

        let Ok(receivers) = self.sender.send(event) else {
            trace!(?topic, round, "No receivers, event dropped");
            return 0;
        };
        debug!(?topic, round, receivers, listeners, "Event published");
        receivers
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
