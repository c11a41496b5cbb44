//! # Event Bus
//!
//! A lock-free, type-partitioned publish/subscribe event bus with synchronous
//! dispatch.
//!
//! ## Overview
//!
//! Subscribers register a callback for an [`EventId`] and a payload type. The
//! pair forms a [`DispatchKey`], and each key owns one lock-free subscriber list
//! ([`fanout_list::ConcurrentList`]). Publishing looks the list up and runs every
//! subscriber on the publishing thread, newest first.
//!
//! ## Features
//!
//! * **Type-Partitioned**: The same event id with different payload types never mixes.
//! * **Lock-Free Dispatch**: Subscribe, unsubscribe and publish never wait on a lock
//!   held by another list operation; only first-time topic creation takes a write lock.
//! * **Handle-Based Unsubscription**: [`Subscription`] handles identify callbacks.
//! * **Backpressure Queues**: [`EventBus::subscribe_queue`] hands payloads to a
//!   bounded `tokio` channel for asynchronous consumers.
//! * **No Global State**: Every [`EventBus`] owns its registry.
//!
//! # Example
//!
//! ```rust
//! use fanout_event_bus::{EventBus, EventBusError, EventId};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! const ORDER_PLACED: EventId = EventId::new(1);
//!
//! fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let total = Arc::new(AtomicU64::new(0));
//!
//!     let sink = Arc::clone(&total);
//!     let sub = bus.subscribe(ORDER_PLACED, move |amount: &u64| {
//!         sink.fetch_add(*amount, Ordering::Relaxed);
//!     })?;
//!
//!     bus.publish(ORDER_PLACED, &40u64);
//!     bus.publish(ORDER_PLACED, &2u64);
//!     assert_eq!(total.load(Ordering::Relaxed), 42);
//!
//!     assert!(bus.unsubscribe(&sub));
//!     assert_eq!(bus.publish(ORDER_PLACED, &1u64), 0);
//!     Ok(())
//! }
//! ```

mod bus;
mod config;
mod error;
mod key;
mod queue;
mod registry;
mod subscription;

pub use bus::EventBus;
pub use config::EventBusConfig;
pub use error::{EventBusError, EventBusErrorExt};
pub use key::{DispatchKey, EventId};
pub use subscription::{Subscription, SubscriptionId};
