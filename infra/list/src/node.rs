use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// A forward reference: the next node in the chain, or the end of it.
pub(crate) type Link<T> = Option<Arc<Node<T>>>;

enum Slot<T> {
    Value(T),
    /// Logical deletion marker. Never reachable from the head, only through
    /// the `next` slot of the node it marks.
    Marker,
}

pub(crate) struct Node<T> {
    slot: Slot<T>,
    pub(crate) next: ArcSwapOption<Self>,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T) -> Arc<Self> {
        Arc::new(Self { slot: Slot::Value(value), next: ArcSwapOption::empty() })
    }

    fn marker(successor: Link<T>) -> Arc<Self> {
        Arc::new(Self { slot: Slot::Marker, next: ArcSwapOption::new(successor) })
    }

    pub(crate) const fn value(&self) -> Option<&T> {
        match &self.slot {
            Slot::Value(value) => Some(value),
            Slot::Marker => None,
        }
    }

    const fn is_marker(&self) -> bool {
        matches!(self.slot, Slot::Marker)
    }

    /// Reads the forward reference, looking through a deletion marker.
    ///
    /// Returns the successor and whether this node has been logically removed.
    pub(crate) fn successor(&self) -> (Link<T>, bool) {
        match self.next.load_full() {
            Some(next) if next.is_marker() => (next.next.load_full(), true),
            next => (next, false),
        }
    }

    /// Logically removes this node, provided its forward reference still points
    /// at `successor`. Exactly one caller can win this for a given node.
    pub(crate) fn mark(&self, successor: &Link<T>) -> bool {
        compare_and_swap(&self.next, successor, Some(Self::marker(successor.clone())))
    }
}

impl<T> Drop for Node<T> {
    // Unwinds uniquely-owned tails in a loop so long chains cannot overflow
    // the stack through recursive `Arc` drops.
    fn drop(&mut self) {
        let mut next = self.next.swap(None);
        while let Some(node) = next {
            next = match Arc::try_unwrap(node) {
                Ok(node) => node.next.swap(None),
                Err(_) => None,
            };
        }
    }
}

/// Replaces `slot` with `new` iff it still holds exactly `current`.
pub(crate) fn compare_and_swap<T>(
    slot: &ArcSwapOption<Node<T>>,
    current: &Link<T>,
    new: Link<T>,
) -> bool {
    let previous = slot.compare_and_swap(current, new);
    same(&previous, current)
}

fn same<T>(a: &Link<T>, b: &Link<T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
