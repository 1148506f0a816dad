//! A height-balanced binary search tree for Rust.
//!
//! This crate provides [`AvlTree`], an ordered multiset backed by an AVL
//! tree. Every mutation rebalances the tree bottom-up with single and double
//! rotations, so search, insertion, removal, and min/max queries are all
//! O(log n) worst-case:
//!
//! - [`insert`](AvlTree::insert) - Add a value (duplicates are kept)
//! - [`remove`](AvlTree::remove) / [`take`](AvlTree::take) - Remove one occurrence of a value
//! - [`find`](AvlTree::find) / [`contains`](AvlTree::contains) - Look a value up
//! - [`first`](AvlTree::first) / [`last`](AvlTree::last) - Minimum and maximum
//! - [`iter`](AvlTree::iter), [`pre_order`](AvlTree::pre_order),
//!   [`post_order`](AvlTree::post_order) - The three depth-first traversals
//!
//! # Example
//!
//! ```
//! use habi_tree::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for value in [50, 30, 70, 20, 40, 60, 80] {
//!     tree.insert(value);
//! }
//!
//! assert_eq!(tree.len(), 7);
//! assert_eq!(tree.first(), Some(&20));
//! assert_eq!(tree.last(), Some(&80));
//!
//! tree.remove(&30);
//!
//! // In-order traversal yields the values in ascending order.
//! let sorted: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(sorted, [20, 40, 50, 60, 70, 80]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Multiset semantics** - Equal values are kept, tie-breaking into the right subtree
//! - **O(log n) everything** - The AVL balance invariant bounds every path by the tree height
//! - **Restartable traversals** - Iterators are pure functions of the current tree state
//!
//! # Implementation
//!
//! The tree is a recursive node structure where every node exclusively owns
//! its two optional children and caches its subtree height. Mutating
//! operations return the possibly-rotated subtree root, which the caller
//! reassigns into its own child slot, so rebalancing runs bottom-up at every
//! ancestor of the mutation point.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod avl_tree;

pub use avl_tree::AvlTree;
