use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};
use core::mem;

use alloc::boxed::Box;

use super::node::{Link, Node, height};

/// The core AVL implementation backing `AvlTree`.
///
/// Every mutating routine takes ownership of a subtree and returns the
/// possibly-new root after rebalancing; the caller reassigns it into its own
/// child slot. Rebalancing therefore runs bottom-up, one ancestor at a time,
/// on the unwind of every recursive mutation.
#[derive(Clone)]
pub(crate) struct RawAvlTree<T> {
    /// The root subtree, absent only when the tree is empty.
    root: Link<T>,
    /// Total number of values in the tree, duplicates included.
    len: usize,
}

impl<T> RawAvlTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Returns the number of values in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no values.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the height of the tree (0 when empty).
    pub(crate) fn height(&self) -> usize {
        height(&self.root)
    }

    /// Drops all values from the tree.
    pub(crate) fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Returns a reference to the root node, if any.
    pub(crate) fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// Consumes the tree, returning the root subtree and the value count.
    pub(crate) fn into_parts(self) -> (Link<T>, usize) {
        (self.root, self.len)
    }

    /// Returns a reference to the minimum value (leftmost node).
    pub(crate) fn first(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    /// Returns a reference to the maximum value (rightmost node).
    pub(crate) fn last(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }
}

impl<T: Ord> RawAvlTree<T> {
    /// Returns a reference to the first value equal to the query, descending
    /// exactly like insert and remove do.
    pub(crate) fn find<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root.as_deref();

        while let Some(node) = current {
            current = match value.cmp(node.value.borrow()) {
                Less => node.left.as_deref(),
                Greater => node.right.as_deref(),
                Equal => return Some(&node.value),
            };
        }
        None
    }

    /// Inserts a value. Never rejects: duplicates of an existing value are
    /// accepted and kept.
    pub(crate) fn insert(&mut self, value: T) {
        let root = self.root.take();
        self.root = Some(Self::insert_at(root, value));
        self.len += 1;
    }

    /// Removes one occurrence of a value, returning it. Removing an absent
    /// value is a no-op returning `None`.
    pub(crate) fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (root, removed) = Self::remove_at(self.root.take(), value);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Removes and returns the minimum value.
    pub(crate) fn pop_first(&mut self) -> Option<T> {
        let root = self.root.take()?;
        let (root, min) = Self::remove_min(root);
        self.root = root;
        self.len -= 1;
        Some(min)
    }

    /// Removes and returns the maximum value.
    pub(crate) fn pop_last(&mut self) -> Option<T> {
        let root = self.root.take()?;
        let (root, max) = Self::remove_max(root);
        self.root = root;
        self.len -= 1;
        Some(max)
    }

    /// Recursive insert: strictly-smaller values descend left, everything
    /// else (equal values included) descends right, so duplicate runs stay
    /// adjacent in the in-order sequence. A new leaf materializes at the
    /// first absent child, and every node on the unwind path rebalances.
    fn insert_at(link: Link<T>, value: T) -> Box<Node<T>> {
        let Some(mut node) = link else {
            return Node::new(value);
        };

        if value < node.value {
            node.left = Some(Self::insert_at(node.left.take(), value));
        } else {
            node.right = Some(Self::insert_at(node.right.take(), value));
        }
        node.rebalance()
    }

    /// Recursive remove. Returns the new subtree root and the removed value.
    fn remove_at<Q>(link: Link<T>, value: &Q) -> (Link<T>, Option<T>)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(mut node) = link else {
            // Absent child: the value is not in this subtree.
            return (None, None);
        };

        let removed = match value.cmp(node.value.borrow()) {
            Less => {
                let (left, removed) = Self::remove_at(node.left.take(), value);
                node.left = left;
                removed
            }
            Greater => {
                let (right, removed) = Self::remove_at(node.right.take(), value);
                node.right = right;
                removed
            }
            Equal => match (node.left.take(), node.right.take()) {
                // Leaf: discard the node; the parent rebalances on unwind.
                (None, None) => return (None, Some(node.value)),
                // One child: promote it directly, its height is already correct.
                (Some(child), None) | (None, Some(child)) => return (Some(child), Some(node.value)),
                // Two children: overwrite this value with the in-order
                // successor and remove that minimum from the right subtree.
                // The node itself survives.
                (left @ Some(_), Some(right)) => {
                    let (right, successor) = Self::remove_min(right);
                    node.left = left;
                    node.right = right;
                    Some(mem::replace(&mut node.value, successor))
                }
            },
        };

        (Some(node.rebalance()), removed)
    }

    /// Unlinks the leftmost node of a subtree, which holds an occurrence of
    /// the minimum value. Rotations can leave equal values on the left
    /// spine, so this picks the deepest occurrence; for the multiset that
    /// is indistinguishable from removing the minimum by value.
    fn remove_min(mut node: Box<Node<T>>) -> (Link<T>, T) {
        match node.left.take() {
            Some(left) => {
                let (left, min) = Self::remove_min(left);
                node.left = left;
                (Some(node.rebalance()), min)
            }
            None => (node.right.take(), node.value),
        }
    }

    /// Exact mirror of [`remove_min`](Self::remove_min).
    fn remove_max(mut node: Box<Node<T>>) -> (Link<T>, T) {
        match node.right.take() {
            Some(right) => {
                let (right, max) = Self::remove_max(right);
                node.right = right;
                (Some(node.rebalance()), max)
            }
            None => (node.left.take(), node.value),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    impl<T: Ord + core::fmt::Debug> RawAvlTree<T> {
        /// Walks the whole tree and panics with a report of every violated
        /// invariant: weak BST ordering (left `<=` node `<=` right), cached
        /// height correctness, balance factor range, and the stored length.
        fn validate_invariants(&self) {
            let mut errors = Vec::new();
            let mut count = 0usize;

            if let Some(root) = self.root.as_deref() {
                Self::validate_node(root, None, None, &mut count, &mut errors);
            }

            if count != self.len {
                errors.push(format!("len mismatch: counted {count}, stored {}", self.len));
            }

            assert!(errors.is_empty(), "tree invariants violated:\n{}", errors.join("\n"));
        }

        /// Validates one node and its subtree, returning the actual height.
        /// Both bounds are inclusive: insert routes equal values right, but
        /// a rotation can park a duplicate in the left subtree of an equal
        /// node, so only the weak ordering survives mutations. The
        /// right-biased insert tie-break itself is covered by the sorted
        /// model comparisons.
        #[allow(clippy::cast_possible_wrap)]
        fn validate_node<'a>(
            node: &'a Node<T>,
            lower: Option<&'a T>,
            upper: Option<&'a T>,
            count: &mut usize,
            errors: &mut Vec<String>,
        ) -> usize {
            *count += 1;

            if lower.is_some_and(|lo| node.value < *lo) {
                errors.push(format!("value {:?} below subtree lower bound {lower:?}", node.value));
            }
            if upper.is_some_and(|hi| node.value > *hi) {
                errors.push(format!("value {:?} above subtree upper bound {upper:?}", node.value));
            }

            let left_height = node
                .left
                .as_deref()
                .map_or(0, |left| Self::validate_node(left, lower, Some(&node.value), count, errors));
            let right_height = node
                .right
                .as_deref()
                .map_or(0, |right| Self::validate_node(right, Some(&node.value), upper, count, errors));

            let actual = 1 + left_height.max(right_height);
            if node.height != actual {
                errors.push(format!("stale height at {:?}: cached {}, actual {actual}", node.value, node.height));
            }

            let balance = left_height as isize - right_height as isize;
            if !(-1..=1).contains(&balance) {
                errors.push(format!("balance factor {balance} at {:?}", node.value));
            }

            actual
        }

        /// Collects the in-order sequence for comparison against a model.
        fn in_order_vec(&self) -> Vec<&T> {
            fn walk<'a, T>(link: Option<&'a Node<T>>, out: &mut Vec<&'a T>) {
                if let Some(node) = link {
                    walk(node.left.as_deref(), out);
                    out.push(&node.value);
                    walk(node.right.as_deref(), out);
                }
            }

            let mut out = Vec::with_capacity(self.len);
            walk(self.root.as_deref(), &mut out);
            out
        }
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = RawAvlTree::new();
        for value in 0..100 {
            tree.insert(value);
            tree.validate_invariants();
        }
        // A degenerate BST would be 100 deep; the AVL bound is ~1.44 log2 n.
        assert!(tree.height() <= 9, "height {} exceeds the AVL bound", tree.height());
    }

    #[test]
    fn descending_inserts_stay_balanced() {
        let mut tree = RawAvlTree::new();
        for value in (0..100).rev() {
            tree.insert(value);
            tree.validate_invariants();
        }
        assert!(tree.height() <= 9, "height {} exceeds the AVL bound", tree.height());
    }

    #[test]
    fn duplicate_inserts_survive_rotation() {
        // Three equal inserts chain right-right; the rotation makes the
        // middle node the root, with the first duplicate as its LEFT child.
        let mut tree = RawAvlTree::new();
        for _ in 0..3 {
            tree.insert(8);
            tree.validate_invariants();
        }

        assert_eq!(tree.height(), 2);
        assert_eq!(tree.in_order_vec(), [&8, &8, &8]);

        assert_eq!(tree.remove(&8), Some(8));
        tree.validate_invariants();
        assert_eq!(tree.in_order_vec(), [&8, &8]);
    }

    #[test]
    fn remove_missing_value_is_a_noop() {
        let mut tree = RawAvlTree::new();
        for value in [50, 30, 70] {
            tree.insert(value);
        }

        assert_eq!(tree.remove(&99), None);
        assert_eq!(tree.len(), 3);
        tree.validate_invariants();
        assert_eq!(tree.in_order_vec(), [&30, &50, &70]);
    }

    #[test]
    fn remove_two_child_node_splices_successor() {
        let mut tree = RawAvlTree::new();
        for value in [50, 30, 70, 20, 40, 60, 80] {
            tree.insert(value);
        }

        assert_eq!(tree.remove(&30), Some(30));
        tree.validate_invariants();
        assert_eq!(tree.in_order_vec(), [&20, &40, &50, &60, &70, &80]);
    }

    #[test]
    fn pop_first_and_pop_last_drain_in_order() {
        let mut tree = RawAvlTree::new();
        for value in [5, 3, 8, 1, 9] {
            tree.insert(value);
        }

        assert_eq!(tree.pop_first(), Some(1));
        assert_eq!(tree.pop_last(), Some(9));
        tree.validate_invariants();
        assert_eq!(tree.in_order_vec(), [&3, &5, &8]);
        assert_eq!(tree.len(), 3);
    }

    // Test operations enum for property testing
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        // A small value range forces duplicates and remove hits.
        prop_oneof![
            3 => (0i32..64).prop_map(Op::Insert),
            1 => (0i32..64).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..500)) {
            let mut tree: RawAvlTree<i32> = RawAvlTree::new();
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(value) => {
                        tree.insert(value);
                        let at = model.partition_point(|&v| v <= value);
                        model.insert(at, value);
                    }
                    Op::Remove(value) => {
                        let removed = tree.remove(&value);
                        if let Some(at) = model.iter().position(|&v| v == value) {
                            prop_assert_eq!(removed, Some(model.remove(at)));
                        } else {
                            prop_assert_eq!(removed, None);
                        }
                    }
                }

                tree.validate_invariants();
                prop_assert_eq!(tree.in_order_vec(), model.iter().collect::<Vec<_>>());
            }
        }

        #[test]
        fn find_matches_model_membership(values in prop::collection::vec(0i32..64, 0..200), probe in 0i32..64) {
            let mut tree: RawAvlTree<i32> = RawAvlTree::new();
            for value in &values {
                tree.insert(*value);
            }

            prop_assert_eq!(tree.find(&probe), values.contains(&probe).then_some(&probe));
        }
    }
}
