use crate::bus::EventBus;
use crate::config::MIN_CAPACITY;
use crate::error::EventBusError;
use crate::key::EventId;
use crate::subscription::Subscription;
use std::any::type_name;
use tokio::sync::mpsc;
use tracing::{trace, warn};

impl EventBus {
    /// Subscribes a forwarder that copies each payload into a bounded queue,
    /// so a slow consumer can process events asynchronously.
    ///
    /// When the queue is full the **publishing thread blocks** until the
    /// consumer makes room. Publishing to a queue subscriber must therefore
    /// happen outside an async execution context (use
    /// `tokio::task::spawn_blocking` or a plain thread); the receiver may be
    /// drained from anywhere.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    /// ```rust
    /// use fanout_event_bus::{EventBus, EventId};
    ///
    /// const TICK: EventId = EventId::new(7);
    ///
    /// # fn main() -> Result<(), fanout_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let (_sub, mut rx) = bus.subscribe_queue::<u64>(TICK, 8)?;
    /// bus.publish(TICK, &1u64);
    /// assert_eq!(rx.try_recv().ok(), Some(1));
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe_queue<T>(
        &self,
        event: impl Into<EventId>,
        capacity: usize,
    ) -> Result<(Subscription<T>, mpsc::Receiver<T>), EventBusError>
    where
        T: Clone + Send + 'static,
    {
        let capacity = validate_capacity(capacity)?;
        let (tx, rx) = mpsc::channel(capacity);
        let subscription = self.forward_to(event, tx)?;
        trace!(payload = type_name::<T>(), capacity, "Queue subscription created");
        Ok((subscription, rx))
    }

    /// Same as [`EventBus::subscribe_queue`] with the configured default capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if the configured capacity is zero.
    pub fn subscribe_queue_default<T>(
        &self,
        event: impl Into<EventId>,
    ) -> Result<(Subscription<T>, mpsc::Receiver<T>), EventBusError>
    where
        T: Clone + Send + 'static,
    {
        self.subscribe_queue(event, self.config().queue_capacity)
    }

    /// Subscribes a forwarder into a caller-owned queue.
    ///
    /// Blocking and context rules are the same as for [`EventBus::subscribe_queue`].
    /// Once the receiving half is dropped, forwarded payloads are discarded.
    ///
    /// # Errors
    /// See [`EventBus::subscribe`].
    pub fn forward_to<T>(
        &self,
        event: impl Into<EventId>,
        sender: mpsc::Sender<T>,
    ) -> Result<Subscription<T>, EventBusError>
    where
        T: Clone + Send + 'static,
    {
        self.subscribe(event, move |payload: &T| {
            if sender.blocking_send(payload.clone()).is_err() {
                warn!(payload = type_name::<T>(), "Queue receiver closed; payload dropped");
            }
        })
    }
}

fn validate_capacity(capacity: usize) -> Result<usize, EventBusError> {
    if capacity < MIN_CAPACITY {
        return Err(EventBusError::InvalidCapacity {
            message: format!("capacity must be >= {MIN_CAPACITY}").into(),
            context: None,
        });
    }
    Ok(capacity)
}
