use crate::config::EventBusConfig;
use crate::error::EventBusError;
use crate::key::{DispatchKey, EventId};
use crate::registry::{Registry, Subscriber, Topic};
use crate::subscription::{Subscription, SubscriptionId};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A thread-safe, lock-free event bus with synchronous dispatch.
///
/// Subscribers are partitioned by [`DispatchKey`]: an event identifier plus the
/// payload type. Publishing runs every matching subscriber on the caller's
/// thread, newest subscriber first, and returns once they have all returned.
///
/// The bus is ready for use as soon as it is constructed. It is intentionally
/// not `Clone`; share it by reference or behind an `Arc`.
#[derive(Debug)]
pub struct EventBus {
    registry: Registry,
    config: EventBusConfig,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::from_config(EventBusConfig::default())
    }
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an `EventBus` tuned by `config`.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidConfiguration`] if `config` fails validation.
    ///
    /// # Examples
    /// ```rust
    /// use fanout_event_bus::{EventBus, EventBusConfig};
    ///
    /// # fn main() -> Result<(), fanout_event_bus::EventBusError> {
    /// let bus = EventBus::with_config(EventBusConfig::default().with_queue_capacity(8))?;
    /// assert_eq!(bus.config().queue_capacity, 8);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config(config: EventBusConfig) -> Result<Self, EventBusError> {
        config.validate()?;
        debug!(
            topic_capacity = config.topic_capacity,
            queue_capacity = config.queue_capacity,
            "Event bus configured"
        );
        Ok(Self::from_config(config))
    }

    fn from_config(config: EventBusConfig) -> Self {
        Self { registry: Registry::with_capacity(config.topic_capacity), config }
    }

    /// Returns the configuration the bus was built with.
    #[must_use]
    pub const fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Subscribes `callback` to `event` for payloads of type `T`.
    ///
    /// Any publisher is blocked until all subscribers are done, so keep the
    /// callback fast and hand slow work to a background worker (see
    /// [`EventBus::subscribe_queue`]).
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry entry for the key
    /// holds a different payload type (an internal invariant violation).
    ///
    /// # Examples
    /// ```rust
    /// use fanout_event_bus::{EventBus, EventId};
    ///
    /// const USER_CREATED: EventId = EventId::new(1);
    ///
    /// # fn main() -> Result<(), fanout_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let sub = bus.subscribe(USER_CREATED, |id: &u64| assert_eq!(*id, 42))?;
    /// assert_eq!(bus.publish(USER_CREATED, &42u64), 1);
    /// assert!(bus.unsubscribe(&sub));
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T, F>(
        &self,
        event: impl Into<EventId>,
        callback: F,
    ) -> Result<Subscription<T>, EventBusError>
    where
        T: ?Sized + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let key = DispatchKey::of::<T>(event.into());
        let topic = self.registry.get_or_create::<T>(key)?;
        let id = SubscriptionId::next();

        topic.subscribers.add(Subscriber::new(id, callback));
        trace!(event = %key.event(), payload = key.payload_name(), subscription = %id, "Subscribed");

        Ok(Subscription::new(key, id))
    }

    /// Publishes `payload` to every subscriber of `event` for type `T`.
    ///
    /// Blocks until every subscriber has returned. Subscribers see the same
    /// `payload` instance and must not keep it past the call. Returns the number
    /// of subscribers invoked; `0` when nobody subscribed.
    ///
    /// A panicking subscriber is not contained: the panic unwinds into the
    /// caller and the remaining subscribers for this call are skipped.
    pub fn publish<T: ?Sized + 'static>(&self, event: impl Into<EventId>, payload: &T) -> usize {
        let key = DispatchKey::of::<T>(event.into());
        let Some(topic) = self.topic::<T>(&key) else {
            trace!(event = %key.event(), payload = key.payload_name(), "Event dropped: no subscribers");
            return 0;
        };

        let mut count = 0;
        for subscriber in &topic.subscribers {
            subscriber.call(payload);
            count += 1;
        }

        trace!(event = %key.event(), payload = key.payload_name(), count, "Event dispatched");
        count
    }

    /// Removes the subscription. Returns whether it was still registered.
    pub fn unsubscribe<T: ?Sized + 'static>(&self, subscription: &Subscription<T>) -> bool {
        let key = subscription.key();
        let Some(topic) = self.topic::<T>(key) else {
            trace!(event = %key.event(), payload = key.payload_name(), subscription = %subscription.id(), "Unsubscribe skipped: no topic");
            return false;
        };

        let id = subscription.id();
        let removed = topic.subscribers.remove(|s| s.id == id);
        debug!(event = %key.event(), payload = key.payload_name(), subscription = %id, removed, "Unsubscribed");
        removed
    }

    /// Removes every subscriber of `event` for type `T` and returns how many
    /// were removed.
    pub fn unsubscribe_all<T: ?Sized + 'static>(&self, event: impl Into<EventId>) -> usize {
        let key = DispatchKey::of::<T>(event.into());
        let Some(topic) = self.topic::<T>(&key) else {
            trace!(event = %key.event(), payload = key.payload_name(), "Unsubscribe all skipped: no topic");
            return 0;
        };

        let count = topic.subscribers.remove_all(|_| true);
        debug!(event = %key.event(), payload = key.payload_name(), count, "Unsubscribed all");
        count
    }

    /// Subscribes to an event that carries no payload.
    ///
    /// # Errors
    /// See [`EventBus::subscribe`].
    pub fn subscribe_signal<F>(
        &self,
        event: impl Into<EventId>,
        callback: F,
    ) -> Result<Subscription<()>, EventBusError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(event, move |_: &()| callback())
    }

    /// Publishes an event that carries no payload. Returns the number of
    /// subscribers invoked.
    pub fn publish_signal(&self, event: impl Into<EventId>) -> usize {
        self.publish(event, &())
    }

    /// Returns the number of current subscribers across all topics.
    ///
    /// Approximate while subscriptions change concurrently.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.subscriber_count()
    }

    /// Returns the number of (event, payload type) topics created so far.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.registry.topic_count()
    }

    fn topic<T: ?Sized + 'static>(&self, key: &DispatchKey) -> Option<Arc<Topic<T>>> {
        self.registry.lookup::<T>(key).unwrap_or_else(|err| {
            warn!(error = %err, label = err.as_label(), "Event topic lookup failed");
            None
        })
    }
}
