//! Fixed-capacity FIFO buffer.
//!
//! `BoundedBuffer<T>` backs every in-process log in opsdeck (the trace store,
//! the registry timeline). Eviction is part of [`BoundedBuffer::push`], so a
//! buffer guarded by a lock can never be observed above capacity.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Upper bound on the slots allocated up front; larger buffers grow on demand.
const PREALLOCATE_LIMIT: usize = 1024;

/// A FIFO buffer that drops its oldest elements once `capacity` is exceeded.
///
/// # Example
///
/// ```rust
/// use opsdeck_core::collections::BoundedBuffer;
///
/// let mut buffer = BoundedBuffer::new(2);
/// buffer.push("a");
/// buffer.push("b");
/// assert_eq!(buffer.push("c"), 1);
/// assert_eq!(buffer.to_vec(), vec!["b", "c"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity.min(PREALLOCATE_LIMIT)),
            capacity,
        }
    }

    /// Append an element, evicting from the front until within capacity.
    ///
    /// Returns the number of evicted elements.
    pub fn push(&mut self, item: T) -> usize {
        self.items.push_back(item);
        let mut evicted = 0;
        while self.items.len() > self.capacity {
            self.items.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Copy of all elements, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    /// Copy of the `n` most recent elements, newest first.
    pub fn latest(&self, n: usize) -> Vec<T> {
        self.items.iter().rev().take(n).cloned().collect()
    }
}
