use crate::iter::{Entry, Iter};
use crate::node::{Link, Node, compare_and_swap};
use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicIsize, Ordering};

/// A thread-safe, lock-free singly-linked list.
///
/// New values are inserted at the head, so iteration yields them in reverse
/// insertion order. All operations except [`ConcurrentList::reset`] take `&self`
/// and may be called concurrently from any number of threads.
///
/// The size counter is maintained independently of the chain: under concurrent
/// mutation it may briefly disagree with the chain, but it is exact once no
/// operation is in flight.
pub struct ConcurrentList<T> {
    head: ArcSwapOption<Node<T>>,
    len: AtomicIsize,
}

impl<T> ConcurrentList<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { head: ArcSwapOption::const_empty(), len: AtomicIsize::new(0) }
    }

    /// Inserts `value` as the new head.
    ///
    /// Retries the load-link-swap sequence until it wins against concurrent
    /// insertions and removals at the head. A removed node left at the head is
    /// unlinked before the new node is linked in front of it.
    pub fn add(&self, value: T) {
        let node = Node::new(value);

        loop {
            let head = self.head.load_full();
            if let Some(current) = head.as_deref() {
                let (successor, removed) = current.successor();
                if removed {
                    let _ = self.splice(None, &head, successor);
                    continue;
                }
            }
            node.next.store(head.clone());

            if compare_and_swap(&self.head, &head, Some(Arc::clone(&node))) {
                break;
            }
        }

        self.len.fetch_add(1, Ordering::AcqRel);
    }

    /// Removes the first value (head to tail) matching `predicate`.
    ///
    /// Returns `true` iff this call removed a value. If the structure changes
    /// underneath a splice, the search restarts from the head instead of giving
    /// up, so `predicate` may be evaluated more than once for the same value.
    pub fn remove<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        'search: loop {
            let mut prev: Link<T> = None;
            let mut curr = self.head.load_full();

            while let Some(node) = curr.as_deref() {
                let (successor, removed) = node.successor();

                if removed {
                    if !self.splice(prev.as_deref(), &curr, successor.clone()) {
                        continue 'search;
                    }
                    curr = successor;
                    continue;
                }

                if node.value().is_some_and(&mut predicate) {
                    if !node.mark(&successor) {
                        continue 'search;
                    }
                    self.len.fetch_sub(1, Ordering::AcqRel);
                    // Best effort. If it loses, the node stays linked until the next
                    // `remove`/`remove_all` walks past it, or the next `add` if it is
                    // the head. Iteration skips it meanwhile.
                    let _ = self.splice(prev.as_deref(), &curr, successor);
                    return true;
                }

                prev = curr;
                curr = successor;
            }

            return false;
        }
    }

    /// Removes every value matching `predicate` and returns how many this call
    /// removed.
    ///
    /// Each removal follows the same mark-then-splice discipline as
    /// [`ConcurrentList::remove`]. A value removed by this call is counted
    /// exactly once, even if the walk restarts.
    pub fn remove_all<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;

        'search: loop {
            let mut prev: Link<T> = None;
            let mut curr = self.head.load_full();

            while let Some(node) = curr.as_deref() {
                let (successor, marked) = node.successor();

                if !marked && node.value().is_some_and(&mut predicate) {
                    if !node.mark(&successor) {
                        continue 'search;
                    }
                    removed += 1;
                    self.len.fetch_sub(1, Ordering::AcqRel);
                } else if !marked {
                    prev = curr;
                    curr = successor;
                    continue;
                }

                if !self.splice(prev.as_deref(), &curr, successor.clone()) {
                    continue 'search;
                }
                curr = successor;
            }

            return removed;
        }
    }

    /// Returns a lazy snapshot iterator starting at the current head.
    #[must_use]
    pub fn iter(&self) -> Iter<T> {
        Iter::new(self.head.load_full())
    }

    /// Returns the logical number of values in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.len.load(Ordering::Acquire)).unwrap_or(0)
    }

    /// Returns `true` if the list holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the list and zeroes the size counter.
    ///
    /// Takes `&mut self`: a full structural replacement must not race with
    /// other operations on the same list.
    pub fn reset(&mut self) {
        self.head.store(None);
        *self.len.get_mut() = 0;
    }

    /// Unlinks `victim` by swinging the reference that points at it (the head,
    /// or `prev.next`) over to `successor`.
    fn splice(&self, prev: Option<&Node<T>>, victim: &Link<T>, successor: Link<T>) -> bool {
        let slot = prev.map_or(&self.head, |prev| &prev.next);
        compare_and_swap(slot, victim, successor)
    }
}

impl<T> Default for ConcurrentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ConcurrentList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentList").field("len", &self.len()).finish_non_exhaustive()
    }
}

impl<T> FromIterator<T> for ConcurrentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for ConcurrentList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T> Extend<T> for &ConcurrentList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T> IntoIterator for &ConcurrentList<T> {
    type Item = Entry<T>;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &ConcurrentList<i32>) -> Vec<i32> {
        list.iter().map(|e| *e).collect()
    }

    #[test]
    fn test_add_and_iterate_in_reverse_order() {
        let list = ConcurrentList::new();
        for i in 0..10 {
            list.add(i);
        }

        assert_eq!(list.len(), 10);
        assert_eq!(values(&list), (0..10).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_remove_head_middle_and_tail() {
        let list: ConcurrentList<i32> = (0..10).collect();

        assert!(list.remove(|v| *v == 4));
        assert!(list.remove(|v| *v == 9));
        assert!(list.remove(|v| *v == 0));
        assert!(!list.remove(|v| *v == 0));
        assert_eq!(list.len(), 7);
        assert_eq!(values(&list), vec![8, 7, 6, 5, 3, 2, 1]);
    }

    #[test]
    fn test_remove_only_first_match() {
        let list: ConcurrentList<i32> = [1, 2, 1, 2].into_iter().collect();

        assert!(list.remove(|v| *v == 2));
        assert_eq!(values(&list), vec![1, 2, 1]);
    }

    #[test]
    fn test_remove_all_counts_and_preserves_order() {
        let list: ConcurrentList<i32> = (0..10).collect();
        list.remove(|v| *v == 4);
        list.remove(|v| *v == 9);
        list.remove(|v| *v == 0);

        assert_eq!(list.remove_all(|v| *v < 6), 4);
        assert_eq!(list.len(), 3);
        assert_eq!(values(&list), vec![8, 7, 6]);

        assert_eq!(list.remove_all(|_| true), 3);
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert!(values(&list).is_empty());
    }

    #[test]
    fn test_remove_all_consecutive_matches() {
        let list: ConcurrentList<i32> = [5, 1, 1, 1, 5, 1].into_iter().collect();

        assert_eq!(list.remove_all(|v| *v == 1), 4);
        assert_eq!(values(&list), vec![5, 5]);
    }

    #[test]
    fn test_remove_on_empty_list() {
        let list = ConcurrentList::<i32>::new();
        assert!(!list.remove(|_| true));
        assert_eq!(list.remove_all(|_| true), 0);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_new_is_const() {
        static LIST: ConcurrentList<u8> = ConcurrentList::new();
        assert!(LIST.is_empty());
        LIST.add(1);
        assert_eq!(LIST.len(), 1);
    }

    #[test]
    fn test_add_unlinks_removed_head() {
        let list = ConcurrentList::new();
        list.add(1);
        list.add(2);

        // A removal that marked the head but lost its splice.
        let head = list.head.load_full().expect("head");
        let (successor, _) = head.successor();
        assert!(head.mark(&successor));
        list.len.fetch_sub(1, Ordering::AcqRel);

        list.add(3);
        let new_head = list.head.load_full().expect("head");
        let (next, removed) = new_head.successor();
        assert!(!removed);
        assert_eq!(next.as_deref().and_then(Node::value), Some(&1));
        assert_eq!(values(&list), vec![3, 1]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut list: ConcurrentList<i32> = (0..5).collect();
        list.reset();

        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().count(), 0);

        list.add(42);
        assert_eq!(values(&list), vec![42]);
    }

    #[test]
    fn test_entry_outlives_removal() {
        let list = ConcurrentList::new();
        list.add(String::from("kept"));
        list.add(String::from("gone"));

        let mut iter = list.iter();
        let entry = iter.next().expect("head entry");
        assert!(list.remove(|v| v == "gone"));

        assert_eq!(entry.as_str(), "gone");
        // The unlinked node still leads to the remainder of the chain.
        assert_eq!(iter.next().map(|e| e.get().clone()), Some(String::from("kept")));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_iteration_skips_removed_successors() {
        let list: ConcurrentList<i32> = (0..4).collect();
        let mut iter = list.iter();
        assert_eq!(iter.next().as_deref(), Some(&3));

        assert!(list.remove(|v| *v == 2));
        assert_eq!(iter.map(|e| *e).collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn test_early_termination_has_no_side_effect() {
        let list: ConcurrentList<i32> = (0..100).collect();
        let first_three: Vec<i32> = list.iter().take(3).map(|e| *e).collect();

        assert_eq!(first_three, vec![99, 98, 97]);
        assert_eq!(list.len(), 100);
        assert_eq!(list.iter().count(), 100);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let list: ConcurrentList<i32> = (0..3).collect();
        assert_eq!(values(&list), values(&list));
    }

    #[test]
    fn test_drop_long_chain() {
        let list: ConcurrentList<usize> = (0..200_000).collect();
        assert_eq!(list.len(), 200_000);
        drop(list);
    }

    #[test]
    fn test_debug_shows_len() {
        let list: ConcurrentList<i32> = (0..2).collect();
        assert_eq!(format!("{list:?}"), "ConcurrentList { len: 2, .. }");
    }
}
