//! An ordered multiset backed by a height-balanced (AVL) binary search tree.

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use alloc::boxed::Box;

use smallvec::SmallVec;

use crate::raw::{Link, Node, RawAvlTree};

/// Inline capacity for traversal stacks. Stack depth is bounded by the tree
/// height, so this only spills to the heap once the tree holds a few
/// thousand values.
const STACK_DEPTH: usize = 16;

/// An ordered multiset based on an AVL tree.
///
/// Unlike `BTreeSet`, inserting a value equal to one already present does not
/// replace it: every insertion is kept, and equal values tie-break into the
/// right subtree so they sit adjacent in the in-order sequence. Search,
/// insertion, and removal are O(log n) worst-case; the balance invariant is
/// restored after every mutation with at most one single or double rotation
/// per ancestor of the mutation point.
///
/// It is a logic error for a value to be modified in such a way that its
/// ordering relative to any other value, as determined by the [`Ord`] trait,
/// changes while it is in the tree. This is normally only possible through
/// [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The behavior
/// resulting from such a logic error is not specified, but will not result in
/// undefined behavior.
///
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use habi_tree::AvlTree;
///
/// // Type inference lets us omit an explicit type signature (which
/// // would be `AvlTree<&str>` in this example).
/// let mut books = AvlTree::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains(&"The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// // Remove a book.
/// books.remove(&"The Odyssey");
///
/// // Iterate over everything in sorted order.
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// An `AvlTree` with a known list of values can be initialized from an array:
///
/// ```
/// use habi_tree::AvlTree;
///
/// let tree = AvlTree::from([1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct AvlTree<T> {
    raw: RawAvlTree<T>,
}

impl<T> AvlTree<T> {
    /// Makes a new, empty `AvlTree`. The first insertion establishes the
    /// root; no allocation happens until then.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree: AvlTree<i32> = AvlTree::new();
    /// assert!(tree.is_empty());
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: RawAvlTree::new() }
    }

    /// Returns the number of values in the tree, duplicates included.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(7);
    /// tree.insert(7);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.is_empty());
    /// tree.insert(1);
    /// assert!(!tree.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single value.
    /// The balance invariant keeps this within ~1.44 log2 n.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.height(), 0);
    ///
    /// for value in [2, 1, 3] {
    ///     tree.insert(value);
    /// }
    /// assert_eq!(tree.height(), 2);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Drops all values from the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([1, 2, 3]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the minimum value in the tree, or `None` if it
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([3, 1, 2]);
    /// assert_eq!(tree.first(), Some(&1));
    ///
    /// let empty: AvlTree<i32> = AvlTree::new();
    /// assert_eq!(empty.first(), None);
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns a reference to the maximum value in the tree, or `None` if it
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([3, 1, 2]);
    /// assert_eq!(tree.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Gets an iterator that visits the values in ascending sorted order
    /// (in-order traversal: left subtree, node, right subtree).
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([3, 1, 2]);
    /// let sorted: Vec<i32> = tree.iter().copied().collect();
    /// assert_eq!(sorted, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.raw.root(), self.len())
    }

    /// Gets an iterator over the pre-order traversal: node, left subtree,
    /// right subtree. The first value yielded is the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([2, 1, 3]);
    /// let order: Vec<i32> = tree.pre_order().copied().collect();
    /// assert_eq!(order, [2, 1, 3]);
    /// ```
    pub fn pre_order(&self) -> PreOrder<'_, T> {
        PreOrder::new(self.raw.root(), self.len())
    }

    /// Gets an iterator over the post-order traversal: left subtree, right
    /// subtree, node. The last value yielded is the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([2, 1, 3]);
    /// let order: Vec<i32> = tree.post_order().copied().collect();
    /// assert_eq!(order, [1, 3, 2]);
    /// ```
    pub fn post_order(&self) -> PostOrder<'_, T> {
        PostOrder::new(self.raw.root(), self.len())
    }
}

impl<T: Ord> AvlTree<T> {
    /// Adds a value to the tree. Every value is accepted: inserting a value
    /// equal to one already present keeps both, with the new one placed in
    /// the right subtree of its equal predecessor.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(5);
    /// tree.insert(5);
    ///
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [5, 5]);
    /// ```
    pub fn insert(&mut self, value: T) {
        self.raw.insert(value);
    }

    /// Removes one occurrence of a value from the tree. Returns whether a
    /// value was removed; removing an absent value is a silent no-op.
    ///
    /// The value may be any borrowed form of the tree's value type, but the
    /// ordering on the borrowed form *must* match the ordering on the value
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([1, 2, 2]);
    ///
    /// assert!(tree.remove(&2));
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.take(value).is_some()
    }

    /// Removes and returns one occurrence of a value in the tree, if any,
    /// that is equal to the given one.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([1, 2, 3]);
    /// assert_eq!(tree.take(&2), Some(2));
    /// assert_eq!(tree.take(&2), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value)
    }

    /// Returns a reference to the first value equal to the given one, or
    /// `None` if no such value is in the tree. "Not found" is an ordinary
    /// result, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([1, 2, 3]);
    /// assert_eq!(tree.find(&2), Some(&2));
    /// assert_eq!(tree.find(&4), None);
    /// ```
    #[must_use]
    pub fn find<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(value)
    }

    /// Returns `true` if the tree contains a value equal to the given one.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([1, 2, 3]);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&4));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(value).is_some()
    }

    /// Removes and returns the minimum value of the tree, or `None` if it is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([3, 1, 2]);
    /// assert_eq!(tree.pop_first(), Some(1));
    /// assert_eq!(tree.pop_first(), Some(2));
    /// assert_eq!(tree.pop_first(), Some(3));
    /// assert_eq!(tree.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.pop_first()
    }

    /// Removes and returns the maximum value of the tree, or `None` if it is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let mut tree = AvlTree::from([3, 1, 2]);
    /// assert_eq!(tree.pop_last(), Some(3));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.pop_last()
    }
}

impl<T> Default for AvlTree<T> {
    /// Makes an empty `AvlTree`.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for AvlTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for AvlTree<T> {}

impl<T: PartialOrd> PartialOrd for AvlTree<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for AvlTree<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for AvlTree<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for AvlTree<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlTree<T> {
    /// Converts a `[T; N]` into an `AvlTree<T>`, inserting left to right.
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree1 = AvlTree::from([1, 2, 3, 4]);
    /// let tree2: AvlTree<_> = [1, 2, 3, 4].into();
    /// assert_eq!(tree1, tree2);
    /// ```
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for AvlTree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the values of the tree, in ascending
    /// sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use habi_tree::AvlTree;
    ///
    /// let tree = AvlTree::from([3, 1, 2]);
    /// let sorted: Vec<i32> = tree.into_iter().collect();
    /// assert_eq!(sorted, [1, 2, 3]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        let (root, len) = self.raw.into_parts();
        IntoIter::new(root, len)
    }
}

/// An iterator over the values of an `AvlTree` in ascending sorted order.
///
/// This `struct` is created by the [`iter`] method on [`AvlTree`]. See its
/// documentation for more.
///
/// [`iter`]: AvlTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    /// Nodes whose value (and right subtree) are still pending, deepest last.
    stack: SmallVec<[&'a Node<T>; STACK_DEPTH]>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut iter = Self { stack: SmallVec::new(), remaining: len };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut subtree: Option<&'a Node<T>>) {
        while let Some(node) = subtree {
            self.stack.push(node);
            subtree = node.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { stack: self.stack.clone(), remaining: self.remaining }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the pre-order traversal of an `AvlTree`.
///
/// This `struct` is created by the [`pre_order`] method on [`AvlTree`]. See
/// its documentation for more.
///
/// [`pre_order`]: AvlTree::pre_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PreOrder<'a, T> {
    /// Subtrees not yet visited at all, next one last.
    stack: SmallVec<[&'a Node<T>; STACK_DEPTH]>,
    remaining: usize,
}

impl<'a, T> PreOrder<'a, T> {
    fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut stack = SmallVec::new();
        if let Some(root) = root {
            stack.push(root);
        }
        Self { stack, remaining: len }
    }
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        // Right is pushed first so the left subtree is visited first.
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PreOrder<'_, T> {}
impl<T> FusedIterator for PreOrder<'_, T> {}

impl<T> Clone for PreOrder<'_, T> {
    fn clone(&self) -> Self {
        Self { stack: self.stack.clone(), remaining: self.remaining }
    }
}

impl<T: fmt::Debug> fmt::Debug for PreOrder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over the post-order traversal of an `AvlTree`.
///
/// This `struct` is created by the [`post_order`] method on [`AvlTree`]. See
/// its documentation for more.
///
/// [`post_order`]: AvlTree::post_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PostOrder<'a, T> {
    /// Pending nodes, paired with whether their subtrees are already
    /// expanded onto the stack. A node is yielded on its second visit.
    stack: SmallVec<[(&'a Node<T>, bool); STACK_DEPTH]>,
    remaining: usize,
}

impl<'a, T> PostOrder<'a, T> {
    fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut stack = SmallVec::new();
        if let Some(root) = root {
            stack.push((root, false));
        }
        Self { stack, remaining: len }
    }
}

impl<'a, T> Iterator for PostOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                self.remaining -= 1;
                return Some(&node.value);
            }

            self.stack.push((node, true));
            if let Some(right) = node.right.as_deref() {
                self.stack.push((right, false));
            }
            if let Some(left) = node.left.as_deref() {
                self.stack.push((left, false));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PostOrder<'_, T> {}
impl<T> FusedIterator for PostOrder<'_, T> {}

impl<T> Clone for PostOrder<'_, T> {
    fn clone(&self) -> Self {
        Self { stack: self.stack.clone(), remaining: self.remaining }
    }
}

impl<T: fmt::Debug> fmt::Debug for PostOrder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the values of an `AvlTree` in ascending sorted
/// order.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlTree`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: AvlTree#method.into_iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIter<T> {
    /// Detached nodes whose value and right subtree are still pending,
    /// deepest last. Left subtrees are taken apart on the way down.
    stack: SmallVec<[Box<Node<T>>; STACK_DEPTH]>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    fn new(root: Link<T>, len: usize) -> Self {
        let mut iter = Self { stack: SmallVec::new(), remaining: len };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut subtree: Link<T>) {
        while let Some(mut node) = subtree {
            subtree = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut node = self.stack.pop()?;
        let right = node.right.take();
        self.push_left_spine(right);
        self.remaining -= 1;
        Some(node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.remaining).finish()
    }
}
