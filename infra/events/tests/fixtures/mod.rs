use fanout_event_bus::EventId;
use parking_lot::Mutex;
use std::sync::Arc;

pub const ORDER_PLACED: EventId = EventId::new(1);
pub const ORDER_SHIPPED: EventId = EventId::new(2);
pub const SHUTDOWN: EventId = EventId::new(3);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestEvent(pub usize);

/// Shared log that subscriber callbacks append to.
#[derive(Clone, Debug, Default)]
pub struct Recorder<T>(Arc<Mutex<Vec<T>>>);

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    pub fn push(&self, value: T) {
        self.0.lock().push(value);
    }

    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.0.lock())
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}
