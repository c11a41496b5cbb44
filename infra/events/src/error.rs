use std::borrow::Cow;
use thiserror::Error;

/// Errors that can occur during event bus operations.
///
/// Lookup misses and unsubscribe misses are not errors: they are reported as
/// `0` / `false` by the operations themselves.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventBusError {
    /// Occurs when a registry entry does not have the concrete type its key implies.
    /// This usually indicates an invariant violation in the type registry.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Capacity must be greater than zero for bounded queues.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Invalid configuration supplied to the bus.
    #[error("Invalid event bus configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl EventBusError {
    /// Returns a short stable label (`snake_case`) for use in logs.
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "event_bus_type_mismatch",
            Self::InvalidCapacity { .. } => "event_bus_invalid_capacity",
            Self::InvalidConfiguration { .. } => "event_bus_invalid_configuration",
        }
    }
}

/// Attaches context to an [`EventBusError`] carried in a `Result`.
pub trait EventBusErrorExt<T> {
    /// Sets the error's context, replacing any previous one.
    ///
    /// # Errors
    /// Passes the original error through with `context` attached.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EventBusError>;
}

impl<T> EventBusErrorExt<T> for Result<T, EventBusError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                EventBusError::TypeMismatch { context: c, .. }
                | EventBusError::InvalidCapacity { context: c, .. }
                | EventBusError::InvalidConfiguration { context: c, .. } => {
                    *c = Some(context.into());
                },
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_context() {
        let err = EventBusError::InvalidCapacity {
            message: "capacity must be >= 1".into(),
            context: None,
        };
        assert_eq!(err.to_string(), "Invalid capacity: capacity must be >= 1");
        assert_eq!(err.as_label(), "event_bus_invalid_capacity");
    }

    #[test]
    fn test_context_is_attached() {
        let result: Result<(), EventBusError> = Err(EventBusError::TypeMismatch {
            message: "i32".into(),
            context: None,
        });

        let err = result.context("subscribe").unwrap_err();
        assert_eq!(err.to_string(), "Type mismatch (subscribe): i32");
    }

    #[test]
    fn test_context_passes_ok_through() {
        let result: Result<u8, EventBusError> = Ok(7);
        assert_eq!(result.context("unused").unwrap(), 7);
    }
}
