use crate::error::EventBusError;
use crate::key::DispatchKey;
use crate::subscription::SubscriptionId;
use fanout_list::ConcurrentList;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

/// One registered callback and the identity it is unsubscribed by.
pub(crate) struct Subscriber<T: ?Sized> {
    pub(crate) id: SubscriptionId,
    callback: Callback<T>,
}

impl<T: ?Sized> Subscriber<T> {
    pub(crate) fn new<F>(id: SubscriptionId, callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self { id, callback: Box::new(callback) }
    }

    #[inline]
    pub(crate) fn call(&self, payload: &T) {
        (self.callback)(payload);
    }
}

/// The subscriber list for one [`DispatchKey`].
pub(crate) struct Topic<T: ?Sized> {
    key: DispatchKey,
    pub(crate) subscribers: ConcurrentList<Subscriber<T>>,
}

impl<T: ?Sized> Topic<T> {
    fn new(key: DispatchKey) -> Self {
        Self { key, subscribers: ConcurrentList::new() }
    }
}

impl<T: ?Sized> fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("key", &self.key)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Type-erased view of a [`Topic`], so topics of every payload type can share
/// one map.
trait ErasedTopic: fmt::Debug + Send + Sync {
    fn key(&self) -> DispatchKey;

    fn len(&self) -> usize;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: ?Sized + 'static> ErasedTopic for Topic<T> {
    fn key(&self) -> DispatchKey {
        self.key
    }

    fn len(&self) -> usize {
        self.subscribers.len()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Maps each [`DispatchKey`] to its lazily created [`Topic`].
///
/// Topics are never removed once created, even when emptied.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    topics: RwLock<FxHashMap<DispatchKey, Arc<dyn ErasedTopic>>>,
}

impl Registry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(FxHashMap::with_capacity_and_hasher(capacity, Default::default())),
        }
    }

    /// Returns the topic for `key`, creating it on first use.
    ///
    /// Concurrent first callers all observe the same topic instance.
    pub(crate) fn get_or_create<T: ?Sized + 'static>(
        &self,
        key: DispatchKey,
    ) -> Result<Arc<Topic<T>>, EventBusError> {
        let existing = self.topics.read().get(&key).cloned();

        let topic = match existing {
            Some(topic) => topic,
            None => {
                let mut topics = self.topics.write();
                let topic = topics.entry(key).or_insert_with(|| {
                    debug!(
                        event = %key.event(),
                        payload = key.payload_name(),
                        "Initializing new event topic"
                    );
                    Arc::new(Topic::<T>::new(key)) as Arc<dyn ErasedTopic>
                });
                Arc::clone(topic)
            },
        };

        downcast(topic)
    }

    /// Returns the topic for `key` without creating it.
    pub(crate) fn lookup<T: ?Sized + 'static>(
        &self,
        key: &DispatchKey,
    ) -> Result<Option<Arc<Topic<T>>>, EventBusError> {
        let existing = self.topics.read().get(key).cloned();
        existing.map(downcast::<T>).transpose()
    }

    /// Sum of all topics' subscriber counts; approximate under concurrent activity.
    pub(crate) fn subscriber_count(&self) -> usize {
        self.topics.read().values().map(|topic| topic.len()).sum()
    }

    pub(crate) fn topic_count(&self) -> usize {
        self.topics.read().len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.topics.read().capacity()
    }
}

fn downcast<T: ?Sized + 'static>(
    topic: Arc<dyn ErasedTopic>,
) -> Result<Arc<Topic<T>>, EventBusError> {
    let key = topic.key();
    topic.into_any().downcast::<Topic<T>>().map_err(|_| {
        warn!(
            event = %key.event(),
            registered = key.payload_name(),
            requested = type_name::<T>(),
            "Event topic holds an unexpected payload type"
        );
        EventBusError::TypeMismatch {
            message: type_name::<T>().into(),
            context: Some(format!("topic {key} holds a different payload type").into()),
        }
    })
}
