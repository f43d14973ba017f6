//! This module defines the types of an IAVL tree, generalized over a 256 bit hash function, and
//! the interface through which proofs are constructed from a live tree.
//!
//! An IAVL tree is a height-balanced binary search tree. All values live in leaves. There are two
//! kinds of nodes.
//!   1. Leaf nodes, which have height 0, size 1 and carry a key and a value. The hash of a leaf
//!      is given by hashing its [`LeafData`].
//!   2. Inner nodes, which always have two children. An inner node carries a split key which is
//!      the smallest key of its right subtree, its height (one more than the tallest child) and
//!      its size (the number of leaves beneath it). The hash of an inner node is given by hashing
//!      its [`InnerData`].
//!
//! Lookups descend to the left child when the key is strictly smaller than the split key and to
//! the right child otherwise.

use alloc::vec::Vec;

/// The hash of a node in the tree. In this schema, it is always 256 bits.
pub type NodeHash = [u8; 32];

/// The data of a leaf node.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafData {
    /// The key stored in this leaf.
    #[cfg_attr(feature = "serde", serde(with = "crate::proof::codec::bytes"))]
    pub key: Vec<u8>,
    /// The value stored under the key.
    #[cfg_attr(feature = "serde", serde(with = "crate::proof::codec::bytes"))]
    pub value: Vec<u8>,
}

impl LeafData {
    /// Create leaf data from borrowed key and value.
    pub fn new(key: &[u8], value: &[u8]) -> Self {
        LeafData {
            key: key.to_vec(),
            value: value.to_vec(),
        }
    }
}

/// The data of an inner node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerData {
    /// The height of the node. Always at least 1.
    pub height: u8,
    /// The number of leaves beneath the node.
    pub size: u64,
    /// The hash of the left child of this node.
    pub left: NodeHash,
    /// The hash of the right child of this node.
    pub right: NodeHash,
}

/// A node as observed through a [`Cursor`].
///
/// `hash` is `None` when the node's hash has not been computed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeView<'a> {
    /// A leaf node.
    Leaf {
        /// The key of the leaf.
        key: &'a [u8],
        /// The value of the leaf.
        value: &'a [u8],
        /// The hash of the leaf, if computed.
        hash: Option<NodeHash>,
    },
    /// An inner node.
    Inner {
        /// The split key: the smallest key of the right subtree.
        key: &'a [u8],
        /// The height of the node.
        height: u8,
        /// The number of leaves beneath the node.
        size: u64,
        /// The hash of the node, if computed.
        hash: Option<NodeHash>,
    },
}

impl<'a> NodeView<'a> {
    /// The hash of the node, if computed.
    pub fn hash(&self) -> Option<NodeHash> {
        match *self {
            NodeView::Leaf { hash, .. } | NodeView::Inner { hash, .. } => hash,
        }
    }

    /// The height of the node. Leaves have height 0.
    pub fn height(&self) -> u8 {
        match *self {
            NodeView::Leaf { .. } => 0,
            NodeView::Inner { height, .. } => height,
        }
    }
}

/// Generic cursor over tree storage.
///
/// This is not intended so much for abstraction as it is for dependency injection and
/// testability. This is not required to give results that make sense; higher level code is
/// required to ensure that the nodes actually hash up to a common root.
pub trait Cursor {
    /// Move to the root of the tree.
    fn rewind(&mut self);

    /// The node at the current position. `None` only when the tree is empty.
    fn node(&self) -> Option<NodeView<'_>>;

    /// Peek at the hashes of the children of the current node, if it is an inner node.
    ///
    /// Each hash is `None` when it has not been computed.
    fn peek_children(&self) -> Option<(Option<NodeHash>, Option<NodeHash>)>;

    /// Traverse to the left child of this node, if it is an inner node. No-op otherwise.
    fn traverse_left_child(&mut self);

    /// Traverse to the right child of this node, if it is an inner node. No-op otherwise.
    fn traverse_right_child(&mut self);
}

/// A stable, read-only view of a tree which supports both ordered-index queries and
/// cursor traversal.
///
/// The snapshot must not change for as long as a proof is being constructed from it.
pub trait Snapshot {
    /// The cursor type used to walk this snapshot.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Create a cursor positioned at the root.
    fn cursor(&self) -> Self::Cursor<'_>;

    /// The number of entries in the tree.
    fn size(&self) -> u64;

    /// Look up a key, returning its index in sorted order and its value.
    ///
    /// When the key is absent, the index is that of the first key greater than it, which is
    /// equal to [`Snapshot::size`] when there is none.
    fn lookup(&self, key: &[u8]) -> (u64, Option<Vec<u8>>);

    /// Get the entry at the given index in sorted order.
    fn entry_at(&self, index: u64) -> Option<(Vec<u8>, Vec<u8>)>;
}
