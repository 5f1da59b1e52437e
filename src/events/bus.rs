//! Topic-keyed publish/subscribe broker
//!
//! Each subscription owns one unbounded channel; publishing clones the event
//! into every listener registered under the exact topic, in registration
//! order. The topic table sits behind a mutex so subscribe, publish and
//! cancellation can race from any task without corrupting it. Publishers
//! never wait on consumers.

use ahash::AHashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::events::event::Event;
use crate::events::topic::Topic;

struct Listener {
    id: u64,
    sender: UnboundedSender<Event>,
}

#[derive(Default)]
struct Registry {
    topics: AHashMap<Topic, Vec<Listener>>,
    next_listener: u64,
}

impl Registry {
    fn remove_listener(&mut self, id: u64, topics: &[Topic]) {
        for topic in topics {
            if let Some(listeners) = self.topics.get_mut(topic) {
                listeners.retain(|l| l.id != id);
                if listeners.is_empty() {
                    self.topics.remove(topic);
                }
            }
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A panic while holding the lock leaves the table itself consistent.
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cloneable handle to a shared bus; clones publish into the same table
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one listener under every topic in `topics`
    ///
    /// Repeated topics are registered once. Dropping the returned
    /// [`Subscription`] deregisters it.
    pub fn subscribe<I>(&self, topics: I) -> Subscription
    where
        I: IntoIterator<Item = Topic>,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut unique: Vec<Topic> = Vec::new();
        for topic in topics {
            if !unique.contains(&topic) {
                unique.push(topic);
            }
        }

        let mut registry = lock(&self.registry);
        let id = registry.next_listener;
        registry.next_listener += 1;
        for topic in &unique {
            registry.topics.entry(*topic).or_default().push(Listener {
                id,
                sender: sender.clone(),
            });
        }
        drop(registry);

        tracing::trace!(listener = id, topics = unique.len(), "subscribed");

        Subscription {
            id,
            topics: unique,
            receiver,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every listener on `topic`; returns how many got it
    ///
    /// A topic with no listeners is a logged no-op.
    pub fn publish(&self, topic: &Topic, event: Event) -> usize {
        let mut registry = lock(&self.registry);
        let Some(listeners) = registry.topics.get_mut(topic) else {
            tracing::debug!(%topic, "no subscribers, event dropped");
            return 0;
        };

        let mut delivered = 0;
        listeners.retain(|listener| match listener.sender.send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => false,
        });
        if listeners.is_empty() {
            registry.topics.remove(topic);
        }

        delivered
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        lock(&self.registry).topics.get(topic).map_or(0, Vec::len)
    }

    /// Number of topics with at least one listener
    pub fn topic_count(&self) -> usize {
        lock(&self.registry).topics.len()
    }

    /// Drop every listener; open subscriptions drain and then end
    pub fn shutdown(&self) {
        let mut registry = lock(&self.registry);
        let topics = registry.topics.len();
        registry.topics.clear();
        tracing::debug!(topics, "event bus shut down");
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.topic_count())
            .finish()
    }
}

/// Pull side of a registration
///
/// Events arrive in publish order. The subscription ends (returns `None`)
/// once the bus is shut down or dropped and the buffer is drained.
pub struct Subscription {
    id: u64,
    topics: Vec<Topic>,
    receiver: UnboundedReceiver<Event>,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Next buffered event without waiting
    pub fn try_next(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).remove_listener(self.id, &self.topics);
            tracing::trace!(listener = self.id, "unsubscribed");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topics", &self.topics)
            .finish()
    }
}
