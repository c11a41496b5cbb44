//! # Concurrent List
//!
//! A lock-free, singly-linked list used as per-topic subscriber storage by the
//! event bus.
//!
//! ## Overview
//!
//! [`ConcurrentList`] supports non-blocking insertion at the head, first-match
//! removal, bulk filtered removal and lazy snapshot iteration. Every structural
//! change is a single compare-and-swap (or a retry loop of them); no operation
//! ever takes a lock.
//!
//! ## Reclamation
//!
//! Forward references are reference-counted atomic slots (`arc-swap`), so a node
//! that has been unlinked stays readable for as long as an iterator still holds
//! it. Removal first *marks* a node by routing its forward reference through a
//! marker node, then splices it out. A marked node can no longer be the target
//! of a splice, so two removals racing on adjacent nodes never lose one another.
//!
//! # Example
//!
//! ```rust
//! use fanout_list::ConcurrentList;
//!
//! let list = ConcurrentList::new();
//! for i in 0..5 {
//!     list.add(i);
//! }
//!
//! assert_eq!(list.len(), 5);
//! assert!(list.remove(|v| *v == 2));
//! assert_eq!(list.remove_all(|v| v % 2 == 0), 2);
//!
//! let values: Vec<i32> = list.iter().map(|e| *e).collect();
//! assert_eq!(values, vec![3, 1]);
//! ```

mod iter;
mod list;
mod node;

pub use iter::{Entry, Iter};
pub use list::ConcurrentList;
