use crate::node::{Link, Node};
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Deref;
use std::sync::Arc;

/// A snapshot traversal over a [`ConcurrentList`](crate::ConcurrentList).
///
/// Starts at the head observed when [`ConcurrentList::iter`](crate::ConcurrentList::iter)
/// was called and follows forward references until the chain ends. Values added
/// after that point may or may not be observed. Values removed concurrently are
/// skipped if the removal is visible by the time the iterator reaches them.
///
/// Dropping the iterator early simply stops the traversal.
pub struct Iter<T> {
    next: Link<T>,
}

impl<T> Iter<T> {
    pub(crate) const fn new(head: Link<T>) -> Self {
        Self { next: head }
    }
}

impl<T> Iterator for Iter<T> {
    type Item = Entry<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.next.take()?;
            let (successor, removed) = node.successor();
            self.next = successor;
            if !removed && node.value().is_some() {
                return Some(Entry { node });
            }
        }
    }
}

impl<T> FusedIterator for Iter<T> {}

impl<T> fmt::Debug for Iter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("exhausted", &self.next.is_none()).finish()
    }
}

/// A value yielded by [`Iter`].
///
/// Holds its node alive, so the value stays readable even if the node is
/// unlinked from the list while the entry exists.
pub struct Entry<T> {
    node: Arc<Node<T>>,
}

impl<T> Entry<T> {
    /// Returns a reference to the stored value.
    #[must_use]
    pub fn get(&self) -> &T {
        match self.node.value() {
            Some(value) => value,
            None => unreachable!("iterator never yields marker nodes"),
        }
    }
}

impl<T> Deref for Entry<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> AsRef<T> for Entry<T> {
    fn as_ref(&self) -> &T {
        self.get()
    }
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self { node: Arc::clone(&self.node) }
    }
}

impl<T: fmt::Debug> fmt::Debug for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Entry").field(self.get()).finish()
    }
}
