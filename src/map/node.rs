//! Tree vertices and the link-walking primitives built on them.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use super::Order;

pub(crate) type NodePtr<K, V> = NonNull<Node<K, V>>;
pub(crate) type Link<K, V> = Option<NodePtr<K, V>>;
pub(crate) type LinkPtr<K, V> = NonNull<Link<K, V>>;

/// A heap allocated tree vertex.
///
/// `left` and `right` are owned by this node, `parent` is a non-owning back pointer
/// that is `None` for the root only.
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) parent: Link<K, V>,
    pub(crate) height: usize,
    pub(crate) balance: i8,
}

impl<K, V> Node<K, V> {
    pub(crate) fn create(parent: Link<K, V>, key: K, value: V) -> NodePtr<K, V> {
        let boxed = Box::new(Node {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 0,
            balance: 0,
        });
        unsafe { NodePtr::new_unchecked(Box::into_raw(boxed)) }
    }

    /// Takes back ownership of a node that has been unlinked from its tree.
    ///
    /// # Safety
    ///
    /// `node_ptr` must have been returned by [`Node::create`], must not be reachable
    /// from any tree anymore and must not be used afterwards.
    pub(crate) unsafe fn destroy(node_ptr: NodePtr<K, V>) -> Box<Node<K, V>> {
        Box::from_raw(node_ptr.as_ptr())
    }

    /// Follows left links down to the smallest node of the subtree.
    pub(crate) fn min(mut node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        while let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
            node_ptr = left_ptr;
        }
        node_ptr
    }

    /// Follows right links down to the largest node of the subtree.
    pub(crate) fn max(mut node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        while let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
            node_ptr = right_ptr;
        }
        node_ptr
    }

    /// In-order successor, found without recursion or auxiliary storage.
    pub(crate) fn next(node_ptr: NodePtr<K, V>) -> Link<K, V> {
        unsafe {
            if let Some(right_ptr) = node_ptr.as_ref().right {
                return Some(Self::min(right_ptr));
            }

            // Climb while we are the right child, the first ancestor reached from the
            // left is the successor.
            let mut current = node_ptr;
            let mut parent = current.as_ref().parent;
            while let Some(parent_ptr) = parent {
                if parent_ptr.as_ref().right != Some(current) {
                    break;
                }
                current = parent_ptr;
                parent = current.as_ref().parent;
            }
            parent
        }
    }

    /// In-order predecessor, mirror of [`Node::next`].
    pub(crate) fn prev(node_ptr: NodePtr<K, V>) -> Link<K, V> {
        unsafe {
            if let Some(left_ptr) = node_ptr.as_ref().left {
                return Some(Self::max(left_ptr));
            }

            let mut current = node_ptr;
            let mut parent = current.as_ref().parent;
            while let Some(parent_ptr) = parent {
                if parent_ptr.as_ref().left != Some(current) {
                    break;
                }
                current = parent_ptr;
                parent = current.as_ref().parent;
            }
            parent
        }
    }

    pub(crate) fn step(node_ptr: NodePtr<K, V>, order: Order) -> Link<K, V> {
        match order {
            Order::Ascending => Self::next(node_ptr),
            Order::Descending => Self::prev(node_ptr),
        }
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Searches the subtree rooted at `node_ptr` for `key`.
    pub(crate) fn find(node_ptr: NodePtr<K, V>, key: &K) -> Link<K, V> {
        let mut current = Some(node_ptr);
        while let Some(node_ptr) = current {
            current = unsafe {
                match key.cmp(&node_ptr.as_ref().key) {
                    Ordering::Equal => break,
                    Ordering::Less => node_ptr.as_ref().left,
                    Ordering::Greater => node_ptr.as_ref().right,
                }
            }
        }
        current
    }
}

impl<K: Clone, V> Node<K, V> {
    /// Recursive (reverse) in-order collection of the subtree keys.
    pub(crate) fn collect_keys(node_ptr: NodePtr<K, V>, order: Order, keys: &mut Vec<K>) {
        let node = unsafe { node_ptr.as_ref() };
        let (first, second) = match order {
            Order::Ascending => (node.left, node.right),
            Order::Descending => (node.right, node.left),
        };
        if let Some(first_ptr) = first {
            Self::collect_keys(first_ptr, order, keys);
        }
        keys.push(node.key.clone());
        if let Some(second_ptr) = second {
            Self::collect_keys(second_ptr, order, keys);
        }
    }
}

/// A shared handle to one node of an [`AvlTreeMap`](crate::AvlTreeMap).
///
/// The handle borrows the map, so the tree cannot change while it is alive.
/// Two handles are equal when they point at the same node.
pub struct NodeRef<'a, K, V> {
    node_ptr: NodePtr<K, V>,
    marker: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) fn new(node_ptr: NodePtr<K, V>) -> Self {
        Self {
            node_ptr,
            marker: PhantomData,
        }
    }

    fn wrap(link: Link<K, V>) -> Option<Self> {
        link.map(Self::new)
    }

    fn node(&self) -> &'a Node<K, V> {
        unsafe { &*self.node_ptr.as_ptr() }
    }

    pub fn key(&self) -> &'a K {
        &self.node().key
    }

    pub fn value(&self) -> &'a V {
        &self.node().value
    }

    /// Height of the right subtree minus height of the left subtree.
    pub fn balance(&self) -> i8 {
        self.node().balance
    }

    /// Height of the subtree rooted here, a leaf has height 0.
    pub fn height(&self) -> usize {
        self.node().height
    }

    pub fn left(&self) -> Option<Self> {
        Self::wrap(self.node().left)
    }

    pub fn right(&self) -> Option<Self> {
        Self::wrap(self.node().right)
    }

    pub fn parent(&self) -> Option<Self> {
        Self::wrap(self.node().parent)
    }

    /// The smallest node of this subtree.
    pub fn min(&self) -> Self {
        Self::new(Node::min(self.node_ptr))
    }

    /// The largest node of this subtree.
    pub fn max(&self) -> Self {
        Self::new(Node::max(self.node_ptr))
    }

    /// The in-order successor in the whole tree, `None` for the largest key.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<Self> {
        Self::wrap(Node::next(self.node_ptr))
    }

    /// The in-order predecessor in the whole tree, `None` for the smallest key.
    pub fn prev(&self) -> Option<Self> {
        Self::wrap(Node::prev(self.node_ptr))
    }
}

impl<'a, K: Ord, V> NodeRef<'a, K, V> {
    /// Looks up `key` in this subtree only.
    pub fn find(&self, key: &K) -> Option<Self> {
        Self::wrap(Node::find(self.node_ptr, key))
    }
}

impl<'a, K: Clone, V> NodeRef<'a, K, V> {
    /// Lists the keys of this subtree in the given order.
    pub fn keys(&self, order: Order) -> Vec<K> {
        let mut keys = Vec::new();
        Node::collect_keys(self.node_ptr, order, &mut keys);
        keys
    }
}

// Auto derived Clone would require K: Clone and V: Clone
impl<'a, K, V> Clone for NodeRef<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for NodeRef<'a, K, V> {}

impl<'a, K, V> PartialEq for NodeRef<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.node_ptr == other.node_ptr
    }
}

impl<'a, K, V> Eq for NodeRef<'a, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("balance", &self.balance())
            .finish()
    }
}
