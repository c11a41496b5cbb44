use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of an event, independent of the payload it carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u32);

impl EventId {
    /// Wraps a raw event number.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw event number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for EventId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Selects one subscriber list: "this event, for this payload type".
///
/// Equality and hashing cover the event and the payload's [`TypeId`] only.
/// The payload type name is carried along for diagnostics.
#[derive(Clone, Copy)]
pub struct DispatchKey {
    event: EventId,
    payload: TypeId,
    payload_name: &'static str,
}

impl DispatchKey {
    /// Derives the key for `event` carrying payloads of type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>(event: EventId) -> Self {
        Self { event, payload: TypeId::of::<T>(), payload_name: type_name::<T>() }
    }

    /// Returns the event half of the key.
    #[must_use]
    pub const fn event(&self) -> EventId {
        self.event
    }

    /// Returns the payload type's fingerprint.
    #[must_use]
    pub const fn payload_type(&self) -> TypeId {
        self.payload
    }

    /// Returns the payload type's name, for diagnostics only.
    #[must_use]
    pub const fn payload_name(&self) -> &'static str {
        self.payload_name
    }
}

impl PartialEq for DispatchKey {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event && self.payload == other.payload
    }
}

impl Eq for DispatchKey {}

impl Hash for DispatchKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event.hash(state);
        self.payload.hash(state);
    }
}

impl fmt::Debug for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchKey")
            .field("event", &self.event.0)
            .field("payload", &self.payload_name)
            .finish()
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.event, self.payload_name)
    }
}
