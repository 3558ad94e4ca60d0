use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::node::{Link, Node};
use super::Order;

/// A lazy iterator over the entries of a map, in ascending or descending key order.
///
/// Each step follows parent and child links to the in-order neighbor of the
/// previous node, so no stack is kept.
pub struct Iter<'a, K, V> {
    current: Link<K, V>,
    order: Order,
    remaining: usize,
    marker: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(start: Link<K, V>, order: Order, len: usize) -> Self {
        Self {
            current: start,
            order,
            remaining: len,
            marker: PhantomData,
        }
    }

    /// The direction this iterator walks in.
    pub fn order(&self) -> Order {
        self.order
    }
}

// Auto derived Clone would require K: Clone and V: Clone
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            current: self.current,
            order: self.order,
            remaining: self.remaining,
            marker: PhantomData,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.current?;
        self.current = Node::step(node_ptr, self.order);
        self.remaining -= 1;
        let node = unsafe { &*node_ptr.as_ptr() };
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
