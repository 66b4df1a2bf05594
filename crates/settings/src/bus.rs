//! Change notification bus.
//!
//! An explicit pub/sub registry keyed by topic string. One bus is created per
//! application and handed to every property; cloning a bus clones the handle,
//! not the registry.
//!
//! Delivery is synchronous: `publish` returns after every callback registered
//! on the topic at the start of the publish has run, in subscription order.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::key::PropertyKey;
use crate::value::PropertyValue;

/// Payload delivered to subscribers after a property write.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeNotification {
    /// Topic this was published on (`<Key>ChangeNotification`).
    pub topic: String,
    /// Property that was written.
    pub key: PropertyKey,
    /// Value that was written.
    pub value: PropertyValue,
}

impl ChangeNotification {
    pub fn new(key: PropertyKey, value: PropertyValue) -> Self {
        Self {
            topic: key.notification_topic(),
            key,
            value,
        }
    }
}

type Callback = Rc<RefCell<dyn FnMut(&ChangeNotification)>>;

struct Listener {
    id: u64,
    topic: String,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
}

#[derive(Clone, Default)]
pub struct NotificationBus {
    registry: Rc<RefCell<Registry>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` on `topic`.
    ///
    /// The callback stays registered while the returned `Subscription` is alive.
    pub fn subscribe<F>(&self, topic: impl Into<String>, callback: F) -> Subscription
    where
        F: FnMut(&ChangeNotification) + 'static,
    {
        let topic = topic.into();
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;

        log::trace!("subscribe #{id} on {topic}");
        registry.listeners.push(Listener {
            id,
            topic,
            callback: Rc::new(RefCell::new(callback)),
        });

        Subscription {
            registry: Rc::downgrade(&self.registry),
            id: Some(id),
        }
    }

    /// Deliver `notification` to every subscriber of its topic.
    ///
    /// Returns the number of callbacks that ran. A callback that is already
    /// running (re-entrant publish on its own topic) is skipped.
    pub fn publish(&self, notification: &ChangeNotification) -> usize {
        // Snapshot so callbacks can subscribe/unsubscribe while we deliver.
        let callbacks: Vec<Callback> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.topic == notification.topic)
            .map(|l| Rc::clone(&l.callback))
            .collect();

        log::debug!(
            "publish {} = {} to {} subscriber(s)",
            notification.topic,
            notification.value,
            callbacks.len()
        );

        let mut delivered = 0;
        for callback in callbacks {
            match callback.try_borrow_mut() {
                Ok(mut f) => {
                    f(notification);
                    delivered += 1;
                }
                Err(_) => {
                    log::warn!("skipping re-entrant delivery on {}", notification.topic);
                }
            }
        }
        delivered
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.topic == topic)
            .count()
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("NotificationBus")
            .field("listeners", &registry.listeners.len())
            .finish()
    }
}

/// Keeps a callback registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: Option<u64>,
}

impl Subscription {
    /// Keep the callback registered for the lifetime of the bus.
    pub fn detach(mut self) {
        self.id = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let (Some(id), Some(registry)) = (self.id, self.registry.upgrade()) else {
            return;
        };
        // The registry is never borrowed while a callback runs, so this can't conflict
        // even when a callback drops a subscription.
        let removed = {
            let mut registry = registry.borrow_mut();
            registry
                .listeners
                .iter()
                .position(|l| l.id == id)
                .map(|pos| registry.listeners.remove(pos))
        };
        // Callback captures may hold subscriptions of their own; drop them unborrowed.
        if removed.is_some() {
            log::trace!("unsubscribe #{id}");
        }
        drop(removed);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
