use alloc::boxed::Box;
use core::cmp::max;

/// An owned, possibly-absent subtree.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

// AVL tree: each node exclusively owns its children and caches the height
// of the subtree rooted at it (1 for a leaf, 0 for an absent child).
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) height: usize,
}

/// Returns the cached height of a possibly-absent subtree.
#[inline]
pub(crate) fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

impl<T> Node<T> {
    /// Creates a new leaf node holding `value`.
    pub(crate) fn new(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Recomputes the cached height from the children's heights.
    /// The children's own cached heights must already be correct.
    #[inline]
    pub(crate) fn update_height(&mut self) {
        self.height = 1 + max(height(&self.left), height(&self.right));
    }

    /// Left height minus right height; in `[-1, 1]` at every node once a
    /// mutation has completed.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    /// Rotates this subtree left: the right child becomes the new root, its
    /// former left subtree becomes this node's right subtree, and this node
    /// becomes the new root's left child. Heights are recomputed bottom-up.
    ///
    /// Panics if there is no right child; callers only rotate left when the
    /// subtree is right-heavy, which guarantees one.
    pub(crate) fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut root = self.right.take().expect("rotate_left without a right child");
        self.right = root.left.take();
        self.update_height();
        root.left = Some(self);
        root.update_height();
        root
    }

    /// Exact mirror of [`rotate_left`](Node::rotate_left).
    pub(crate) fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut root = self.left.take().expect("rotate_right without a left child");
        self.left = root.right.take();
        self.update_height();
        root.right = Some(self);
        root.update_height();
        root
    }

    /// Restores the balance invariant at this node and returns the new
    /// subtree root. Both children must already satisfy the invariant; a
    /// single insert or delete perturbs any node's balance factor by at most
    /// one, so at most a double rotation is ever needed here.
    pub(crate) fn rebalance(mut self: Box<Self>) -> Box<Self> {
        self.update_height();
        let balance = self.balance_factor();

        if balance > 1 {
            let left = self.left.take().expect("left-heavy node without a left child");
            // Left-right case: straighten the left child first.
            self.left = Some(if left.balance_factor() < 0 { left.rotate_left() } else { left });
            self.rotate_right()
        } else if balance < -1 {
            let right = self.right.take().expect("right-heavy node without a right child");
            // Right-left case, mirrored.
            self.right = Some(if right.balance_factor() > 0 { right.rotate_right() } else { right });
            self.rotate_left()
        } else {
            self
        }
    }
}
