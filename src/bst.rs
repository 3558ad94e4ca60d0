//! A plain, unbalanced binary tree ordered by a caller supplied comparison.

use std::fmt;

struct TreeNode<T> {
    value: T,
    left: Option<Box<TreeNode<T>>>,
    right: Option<Box<TreeNode<T>>>,
}

impl<T> TreeNode<T> {
    fn new(value: T) -> Self {
        TreeNode {
            value,
            left: None,
            right: None,
        }
    }
}

/// An unbalanced binary tree.
///
/// A value goes to the left of a node when `goes_left(value, node_value)` returns
/// true and to the right otherwise, so with a strict comparison equal values are
/// kept and end up to the right of each other.
///
/// ```
/// use avl_map::BinaryTree;
/// let mut tree = BinaryTree::new(|a: &i32, b: &i32| a < b);
/// for value in [5, 2, 8, 2] {
///     tree.insert(value);
/// }
/// assert_eq!(tree.in_order(), vec![&2, &2, &5, &8]);
/// ```
pub struct BinaryTree<T, F> {
    goes_left: F,
    root: Option<Box<TreeNode<T>>>,
    len: usize,
}

impl<T, F> BinaryTree<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub fn new(goes_left: F) -> Self {
        BinaryTree {
            goes_left,
            root: None,
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) {
        let goes_left = &self.goes_left;
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if goes_left(&value, &node.value) {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Box::new(TreeNode::new(value)));
        self.len += 1;
    }
}

impl<T, F> BinaryTree<T, F> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Values in in-order sequence: left subtree, node, right subtree.
    pub fn in_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root.as_deref();
        loop {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            let Some(node) = stack.pop() else {
                break;
            };
            result.push(&node.value);
            current = node.right.as_deref();
        }
        result
    }
}

// Sorted input degenerates into a list, so avoid dropping it recursively.
impl<T, F> Drop for BinaryTree<T, F> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TreeNode<T>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for BinaryTree<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.in_order()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::BinaryTree;

    #[test]
    fn test_empty() {
        let tree = BinaryTree::new(|a: &i32, b: &i32| a < b);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.in_order().is_empty());
    }

    #[test]
    fn test_in_order_keeps_duplicates() {
        let mut tree = BinaryTree::new(|a: &i32, b: &i32| a < b);
        for value in [50, 30, 70, 30, 20, 80, 70] {
            tree.insert(value);
        }
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.in_order(), vec![&20, &30, &30, &50, &70, &70, &80]);
    }

    #[test]
    fn test_reversed_comparison() {
        let mut tree = BinaryTree::new(|a: &i32, b: &i32| a > b);
        for value in [3, 1, 4, 1, 5, 9, 2, 6] {
            tree.insert(value);
        }
        assert_eq!(tree.in_order(), vec![&9, &6, &5, &4, &3, &2, &1, &1]);
    }

    #[test]
    fn test_sorted_input() {
        let mut tree = BinaryTree::new(|a: &u32, b: &u32| a < b);
        for value in 0..5_000 {
            tree.insert(value);
        }
        assert_eq!(tree.len(), 5_000);
        let values: Vec<u32> = tree.in_order().into_iter().copied().collect();
        assert_eq!(values, (0..5_000).collect::<Vec<_>>());
    }
}
