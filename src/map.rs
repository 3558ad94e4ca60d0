//! An ordered map implemented with an AVL tree.

use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;

use log::trace;

mod iter;
mod node;

pub use iter::Iter;
pub use node::NodeRef;

use node::{Link, LinkPtr, Node, NodePtr};

/// Direction of an ordered walk over the keys of a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

/// An ordered map implemented with an AVL tree.
///
/// Every node keeps a pointer to its parent, which lets the tree rebalance on the way
/// up after a mutation and step to the in-order successor or predecessor of any node
/// without recursion.
///
/// ```
/// use avl_map::{AvlTreeMap, Order};
/// let mut map = AvlTreeMap::new();
/// map.insert(50, "fifty");
/// map.insert(30, "thirty");
/// map.insert(70, "seventy");
/// assert_eq!(map.get(&30), Some(&"thirty"));
/// map.remove(&30);
/// assert!(map.get(&30).is_none());
/// assert_eq!(map.all(Order::Descending), vec![70, 50]);
/// ```
pub struct AvlTreeMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key)
            .map(|node_ptr| &unsafe { &*node_ptr.as_ptr() }.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|node_ptr| {
            let node = unsafe { &*node_ptr.as_ptr() };
            (&node.key, &node.value)
        })
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find(key)
            .map(|node_ptr| &mut unsafe { &mut *node_ptr.as_ptr() }.value)
    }

    /// Returns true if the map contains a value for the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present its value is replaced in place and the old value
    /// is returned, the tree structure is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent: Link<K, V> = None;
        let mut link_ptr: LinkPtr<K, V> = LinkPtr::from(&mut self.root);
        unsafe {
            while let Some(mut node_ptr) = *link_ptr.as_ref() {
                match key.cmp(&node_ptr.as_ref().key) {
                    Ordering::Equal => {
                        trace!("insert: key present, replacing value");
                        return Some(mem::replace(&mut node_ptr.as_mut().value, value));
                    }
                    Ordering::Less => link_ptr = LinkPtr::from(&mut node_ptr.as_mut().left),
                    Ordering::Greater => link_ptr = LinkPtr::from(&mut node_ptr.as_mut().right),
                }
                parent = Some(node_ptr);
            }
            *link_ptr.as_mut() = Some(Node::create(parent, key, value));
        }
        self.num_nodes += 1;
        trace!("insert: new node, {} nodes", self.num_nodes);
        self.rebalance(parent);
        None
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let node_ptr = self.find(key)?;
        debug_assert!(self.num_nodes >= 1);
        let unlinked_ptr = self.unlink_node(node_ptr);
        let node = unsafe { Node::destroy(unlinked_ptr) };
        self.num_nodes -= 1;
        trace!("remove: unlinked node, {} nodes", self.num_nodes);
        Some((node.key, node.value))
    }

    /// Asserts that the internal tree structure is consistent:
    /// parent and child links agree, keys are ordered, stored heights and balances
    /// match the actual subtrees and every balance lies in `-1..=1`.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        unsafe {
            // Check root link
            if let Some(root_node_ptr) = self.root {
                assert!(root_node_ptr.as_ref().parent.is_none());
            }

            // Check tree nodes
            let mut num_nodes = 0;
            self.preorder(|node_ptr| {
                let mut height = 0;
                let mut left_height = 0;
                let mut right_height = 0;

                // Check link for left child node
                if let Some(left_ptr) = node_ptr.as_ref().left {
                    assert!(left_ptr.as_ref().parent == Some(node_ptr));
                    assert!(left_ptr.as_ref().key < node_ptr.as_ref().key);
                    left_height = left_ptr.as_ref().height + 1;
                    height = cmp::max(height, left_height);
                }

                // Check link for right child node
                if let Some(right_ptr) = node_ptr.as_ref().right {
                    assert!(right_ptr.as_ref().parent == Some(node_ptr));
                    assert!(right_ptr.as_ref().key > node_ptr.as_ref().key);
                    right_height = right_ptr.as_ref().height + 1;
                    height = cmp::max(height, right_height);
                }

                // Check height and balance factor
                assert_eq!(node_ptr.as_ref().height, height);
                assert_eq!(
                    node_ptr.as_ref().balance as isize,
                    right_height as isize - left_height as isize
                );

                // Check AVL condition (nearly balance)
                assert!((-1..=1).contains(&node_ptr.as_ref().balance));

                num_nodes += 1;
            });

            // Check number of nodes
            assert_eq!(num_nodes, self.num_nodes);
        }
    }

    fn find(&self, key: &K) -> Link<K, V> {
        self.root.and_then(|root_ptr| Node::find(root_ptr, key))
    }

    /// Unlinks the node holding the matched key and returns the node that has been
    /// physically detached from the tree.
    ///
    /// A node with two children is not detached itself: its in-order successor (which
    /// has no left child) hands over key and value and is detached instead.
    fn unlink_node(&mut self, node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        unsafe {
            let mut unlinked_ptr = node_ptr;
            if let (Some(_), Some(right_ptr)) = (node_ptr.as_ref().left, node_ptr.as_ref().right)
            {
                unlinked_ptr = Node::min(right_ptr);
                debug_assert!(unlinked_ptr.as_ref().left.is_none());
                mem::swap(
                    &mut (*node_ptr.as_ptr()).key,
                    &mut (*unlinked_ptr.as_ptr()).key,
                );
                mem::swap(
                    &mut (*node_ptr.as_ptr()).value,
                    &mut (*unlinked_ptr.as_ptr()).value,
                );
            }

            // Node to-unlink is stem or leaf, splice its only child into its place
            let child = unlinked_ptr.as_ref().left.or(unlinked_ptr.as_ref().right);
            if let Some(mut child_ptr) = child {
                child_ptr.as_mut().parent = unlinked_ptr.as_ref().parent;
            }
            match unlinked_ptr.as_ref().parent {
                None => self.root = child,
                Some(mut parent_ptr) => {
                    if parent_ptr.as_ref().left == Some(unlinked_ptr) {
                        parent_ptr.as_mut().left = child;
                    } else {
                        parent_ptr.as_mut().right = child;
                    }
                    // Parent node might be out of balance now
                    self.rebalance(Some(parent_ptr));
                }
            }
            unlinked_ptr
        }
    }

    fn rotate_left_right(&mut self, node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
            self.rotate_left(left_ptr);
        }
        self.rotate_right(node_ptr)
    }

    fn rotate_right_left(&mut self, node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
            self.rotate_right(right_ptr);
        }
        self.rotate_left(node_ptr)
    }

    /// Rebalances nodes starting from given position up to the root node.
    ///
    /// Every ancestor gets its height and balance refreshed, not only the ones
    /// below the first rotation.
    fn rebalance(&mut self, start_from: Link<K, V>) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let subtree_ptr = self.rebalance_node(node_ptr);
            current = unsafe { subtree_ptr.as_ref().parent };
        }
    }

    /// Restores AVL condition (balance) at given node if necessary and adjusts height.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    /// Returns the root of the (possibly rotated) subtree.
    fn rebalance_node(&mut self, node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        Self::adjust_height(node_ptr);
        let (balance, left, right) = unsafe {
            let node = node_ptr.as_ref();
            (node.balance, node.left, node.right)
        };
        debug_assert!((-2..=2).contains(&balance));
        match (balance, left, right) {
            // Left heavy, single rotation unless the inner grandchild is taller
            (-2, Some(left_ptr), _) => {
                if Self::balance_of(left_ptr) > 0 {
                    self.rotate_left_right(node_ptr)
                } else {
                    self.rotate_right(node_ptr)
                }
            }
            // Right heavy, mirrored
            (2, _, Some(right_ptr)) => {
                if Self::balance_of(right_ptr) < 0 {
                    self.rotate_right_left(node_ptr)
                } else {
                    self.rotate_left(node_ptr)
                }
            }
            _ => node_ptr,
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn preorder<F: FnMut(NodePtr<K, V>)>(&self, f: F) {
        self.traverse(f, |_| {}, |_| {});
    }
}

impl<K, V> AvlTreeMap<K, V> {
    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, counted in edges from the root.
    /// Both an empty map and a map with a single element have height 0.
    pub fn height(&self) -> usize {
        match self.root {
            None => 0,
            Some(root_ptr) => unsafe { root_ptr.as_ref().height },
        }
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.postorder(|node_ptr| unsafe {
            drop(Node::destroy(node_ptr));
        });
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns a handle to the root node, or `None` if the map is empty.
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(NodeRef::new)
    }

    /// Returns a handle to the node with the smallest key.
    pub fn first(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(|root_ptr| NodeRef::new(Node::min(root_ptr)))
    }

    /// Returns a handle to the node with the largest key.
    pub fn last(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(|root_ptr| NodeRef::new(Node::max(root_ptr)))
    }

    /// Gets a lazy iterator over the entries of the map in the given order.
    pub fn iter(&self, order: Order) -> Iter<'_, K, V> {
        let start = self.root.map(|root_ptr| match order {
            Order::Ascending => Node::min(root_ptr),
            Order::Descending => Node::max(root_ptr),
        });
        Iter::new(start, order, self.num_nodes)
    }

    /// Calls `visitor` once per node, in ascending or descending key order.
    ///
    /// The walk starts at the smallest (largest) node and repeatedly steps to the
    /// in-order successor (predecessor) until there is none left.
    pub fn iterate<F>(&self, order: Order, mut visitor: F)
    where
        F: FnMut(NodeRef<'_, K, V>),
    {
        let mut current = match order {
            Order::Ascending => self.first(),
            Order::Descending => self.last(),
        };
        while let Some(node) = current {
            visitor(node);
            current = match order {
                Order::Ascending => node.next(),
                Order::Descending => node.prev(),
            };
        }
    }

    /// Collects all keys of the map in the given order.
    pub fn all(&self, order: Order) -> Vec<K>
    where
        K: Clone,
    {
        self.root().map(|root| root.keys(order)).unwrap_or_default()
    }

    /// Writes an indented picture of the tree, one node per line with its key and
    /// balance factor, left subtree before right subtree.
    ///
    /// ```text
    /// + root [ 50 ] 0
    /// | + left [ 30 ] 0
    /// | + right [ 70 ] 0
    /// ```
    pub fn dump<W>(&self, w: &mut W) -> fmt::Result
    where
        W: fmt::Write,
        K: fmt::Display,
    {
        Self::dump_node(w, self.root, 0, "root")
    }

    fn dump_node<W>(w: &mut W, link: Link<K, V>, level: usize, title: &str) -> fmt::Result
    where
        W: fmt::Write,
        K: fmt::Display,
    {
        if let Some(node_ptr) = link {
            let node = unsafe { node_ptr.as_ref() };
            writeln!(
                w,
                "{}+ {} [ {} ] {}",
                "| ".repeat(level),
                title,
                node.key,
                node.balance
            )?;
            Self::dump_node(w, node.left, level + 1, "left")?;
            Self::dump_node(w, node.right, level + 1, "right")?;
        }
        Ok(())
    }

    fn balance_of(node_ptr: NodePtr<K, V>) -> i8 {
        unsafe { node_ptr.as_ref().balance }
    }

    fn left_height(node_ptr: NodePtr<K, V>) -> usize {
        unsafe {
            match node_ptr.as_ref().left {
                None => 0,
                Some(left_ptr) => left_ptr.as_ref().height + 1,
            }
        }
    }

    fn right_height(node_ptr: NodePtr<K, V>) -> usize {
        unsafe {
            match node_ptr.as_ref().right {
                None => 0,
                Some(right_ptr) => right_ptr.as_ref().height + 1,
            }
        }
    }

    /// Refreshes height and balance factor from the (already correct) children.
    fn adjust_height(mut node_ptr: NodePtr<K, V>) {
        let left_height = Self::left_height(node_ptr);
        let right_height = Self::right_height(node_ptr);
        unsafe {
            node_ptr.as_mut().height = cmp::max(left_height, right_height);
            node_ptr.as_mut().balance = (right_height as isize - left_height as isize) as i8;
        }
    }

    /// Promotes the right child of `node_ptr` and returns it.
    fn rotate_left(&mut self, mut node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        unsafe {
            let Some(mut right_ptr) = node_ptr.as_ref().right else {
                return node_ptr;
            };
            trace!("rotate left at height {}", node_ptr.as_ref().height);

            node_ptr.as_mut().right = right_ptr.as_ref().left;
            if let Some(mut right_left_ptr) = right_ptr.as_mut().left {
                right_left_ptr.as_mut().parent = Some(node_ptr);
            }

            right_ptr.as_mut().parent = node_ptr.as_ref().parent;
            match node_ptr.as_ref().parent {
                None => self.root = Some(right_ptr),
                Some(mut parent_ptr) => {
                    if parent_ptr.as_ref().left == Some(node_ptr) {
                        parent_ptr.as_mut().left = Some(right_ptr);
                    } else {
                        parent_ptr.as_mut().right = Some(right_ptr);
                    }
                }
            }

            right_ptr.as_mut().left = Some(node_ptr);
            node_ptr.as_mut().parent = Some(right_ptr);

            Self::adjust_height(node_ptr);
            Self::adjust_height(right_ptr);
            right_ptr
        }
    }

    /// Promotes the left child of `node_ptr` and returns it.
    fn rotate_right(&mut self, mut node_ptr: NodePtr<K, V>) -> NodePtr<K, V> {
        unsafe {
            let Some(mut left_ptr) = node_ptr.as_ref().left else {
                return node_ptr;
            };
            trace!("rotate right at height {}", node_ptr.as_ref().height);

            node_ptr.as_mut().left = left_ptr.as_ref().right;
            if let Some(mut left_right_ptr) = left_ptr.as_ref().right {
                left_right_ptr.as_mut().parent = Some(node_ptr);
            }

            left_ptr.as_mut().parent = node_ptr.as_ref().parent;
            match node_ptr.as_ref().parent {
                None => self.root = Some(left_ptr),
                Some(mut parent_ptr) => {
                    if parent_ptr.as_ref().left == Some(node_ptr) {
                        parent_ptr.as_mut().left = Some(left_ptr);
                    } else {
                        parent_ptr.as_mut().right = Some(left_ptr);
                    }
                }
            }

            left_ptr.as_mut().right = Some(node_ptr);
            node_ptr.as_mut().parent = Some(left_ptr);

            Self::adjust_height(node_ptr);
            Self::adjust_height(left_ptr);
            left_ptr
        }
    }

    fn postorder<F: FnMut(NodePtr<K, V>)>(&self, f: F) {
        self.traverse(|_| {}, |_| {}, f);
    }

    fn traverse<Pre, In, Post>(&self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(NodePtr<K, V>),
        In: FnMut(NodePtr<K, V>),
        Post: FnMut(NodePtr<K, V>),
    {
        if let Some(mut node_ptr) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_ptr);
                        if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
                            node_ptr = left_ptr;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(node_ptr);
                        if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
                            node_ptr = right_ptr;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        // Post order traversal is used for node deletion,
                        // so make sure not to use node pointer after postorder call.
                        if let Some(parent_ptr) = unsafe { node_ptr.as_ref().parent } {
                            if Some(node_ptr) == unsafe { parent_ptr.as_ref().left } {
                                dir = Direction::FromLeft;
                            } else {
                                dir = Direction::FromRight;
                            }
                            postorder(node_ptr);
                            node_ptr = parent_ptr;
                        } else {
                            postorder(node_ptr);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Copies the subtree below `node_ptr` node by node, keeping its shape.
    fn clone_subtree(node_ptr: NodePtr<K, V>, parent: Link<K, V>) -> NodePtr<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let node = unsafe { node_ptr.as_ref() };
        let mut clone_ptr = Node::create(parent, node.key.clone(), node.value.clone());
        let left = node
            .left
            .map(|left_ptr| Self::clone_subtree(left_ptr, Some(clone_ptr)));
        let right = node
            .right
            .map(|right_ptr| Self::clone_subtree(right_ptr, Some(clone_ptr)));
        unsafe {
            let clone = clone_ptr.as_mut();
            clone.left = left;
            clone.right = right;
            clone.height = node.height;
            clone.balance = node.balance;
        }
        clone_ptr
    }
}

impl<K, V> Drop for AvlTreeMap<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for AvlTreeMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self
                .root
                .map(|root_ptr| Self::clone_subtree(root_ptr, None)),
            num_nodes: self.num_nodes,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_map().entries(self.iter(Order::Ascending)).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |(key, value)| {
            self.insert(key, value);
        });
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter(Order::Ascending)
    }
}
