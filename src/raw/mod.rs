mod node;
mod raw_avl_tree;

pub(crate) use node::{Link, Node};
pub(crate) use raw_avl_tree::RawAvlTree;
