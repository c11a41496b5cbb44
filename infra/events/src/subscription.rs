use crate::key::{DispatchKey, EventId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of one subscription.
///
/// Ids are drawn from one counter shared by every bus, so a handle can never
/// match a subscriber registered on a different bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocates the next id.
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Handle returned by [`EventBus::subscribe`](crate::EventBus::subscribe).
///
/// Unsubscription matches on the handle's identity, never on the callback
/// itself. Dropping the handle does not unsubscribe.
pub struct Subscription<T: ?Sized> {
    key: DispatchKey,
    id: SubscriptionId,
    _payload: PhantomData<fn(&T)>,
}

impl<T: ?Sized> Subscription<T> {
    pub(crate) const fn new(key: DispatchKey, id: SubscriptionId) -> Self {
        Self { key, id, _payload: PhantomData }
    }

    /// Returns the identity `unsubscribe` matches on.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the event this subscription listens to.
    #[must_use]
    pub const fn event(&self) -> EventId {
        self.key.event()
    }

    /// Returns the (event, payload type) key the subscriber is stored under.
    #[must_use]
    pub const fn key(&self) -> &DispatchKey {
        &self.key
    }
}

impl<T: ?Sized> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Subscription<T> {}

impl<T: ?Sized> PartialEq for Subscription<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: ?Sized> Eq for Subscription<T> {}

impl<T: ?Sized> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).field("key", &self.key).finish()
    }
}
