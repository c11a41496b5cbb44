use crate::error::EventBusError;
use serde::Deserialize;

/// A safe default for queue buffers.
/// 128 is usually enough for a consumer that keeps up with its publishers.
pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 128;
pub(crate) const DEFAULT_TOPIC_CAPACITY: usize = 16;
pub(crate) const MIN_CAPACITY: usize = 1;

/// Tuning knobs for an [`EventBus`](crate::EventBus).
///
/// Deserializable from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// Number of (event, payload type) topics to reserve room for up front.
    pub topic_capacity: usize,
    /// Capacity used by [`EventBus::subscribe_queue_default`](crate::EventBus::subscribe_queue_default).
    pub queue_capacity: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self { topic_capacity: DEFAULT_TOPIC_CAPACITY, queue_capacity: DEFAULT_QUEUE_CAPACITY }
    }
}

impl EventBusConfig {
    #[must_use = "Sets the initial topic capacity of the registry"]
    pub const fn with_topic_capacity(mut self, capacity: usize) -> Self {
        self.topic_capacity = capacity;
        self
    }

    #[must_use = "Sets the default capacity for queue subscriptions"]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Checks the configuration for values the bus cannot honor.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidConfiguration`] if `queue_capacity` is zero.
    pub fn validate(&self) -> Result<(), EventBusError> {
        if self.queue_capacity < MIN_CAPACITY {
            return Err(EventBusError::InvalidConfiguration {
                message: format!("queue_capacity must be >= {MIN_CAPACITY}").into(),
                context: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EventBusConfig::default();
        assert_eq!(config.topic_capacity, DEFAULT_TOPIC_CAPACITY);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = EventBusConfig::default().with_topic_capacity(0).with_queue_capacity(8);
        assert_eq!(config.topic_capacity, 0);
        assert_eq!(config.queue_capacity, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let config = EventBusConfig::default().with_queue_capacity(0);
        assert!(matches!(config.validate(), Err(EventBusError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EventBusConfig = serde_json::from_str(r#"{ "queue_capacity": 4 }"#).unwrap();
        assert_eq!(config.queue_capacity, 4);
        assert_eq!(config.topic_capacity, DEFAULT_TOPIC_CAPACITY);

        let config: EventBusConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EventBusConfig::default());
    }
}
