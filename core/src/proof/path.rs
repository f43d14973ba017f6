//! Paths from a leaf to the root and the adjacency check between two paths.

use crate::{
    hasher::NodeHasher,
    proof::VerifyError,
    tree::{InnerData, LeafData, NodeHash},
};

use alloc::vec::Vec;
use core::fmt;

/// One level of ascent from a leaf towards the root.
///
/// Exactly one of `left` and `right` is populated: the hash of the child which is not on the
/// path. `left` being present means the path continued through the right child of this node
/// and `right` being present means it continued through the left child.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InnerStep {
    /// The height of the inner node.
    pub height: u8,
    /// The number of leaves beneath the inner node.
    pub size: u64,
    /// The hash of the left child, if the path went right.
    #[cfg_attr(feature = "serde", serde(default, with = "crate::proof::codec::option_hash"))]
    pub left: Option<NodeHash>,
    /// The hash of the right child, if the path went left.
    #[cfg_attr(feature = "serde", serde(default, with = "crate::proof::codec::option_hash"))]
    pub right: Option<NodeHash>,
}

impl InnerStep {
    /// Compute the hash of this step's node given the hash of the child on the path.
    pub fn parent_hash<H: NodeHasher>(&self, child: NodeHash) -> Result<NodeHash, VerifyError> {
        // height 0 belongs to leaves.
        if self.height == 0 {
            return Err(VerifyError::MalformedStep);
        }

        let (left, right) = match (self.left, self.right) {
            (Some(left), None) => (left, child),
            (None, Some(right)) => (child, right),
            _ => return Err(VerifyError::MalformedStep),
        };

        Ok(H::hash_inner(&InnerData {
            height: self.height,
            size: self.size,
            left,
            right,
        }))
    }

    /// Whether the step has the same siblings as another, i.e. whether the two describe the
    /// same parent as seen from the same side.
    fn same_siblings(&self, other: &InnerStep) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl fmt::Display for InnerStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InnerStep{{height:{} size:{} left:", self.height, self.size)?;
        write_hash(f, self.left.as_ref())?;
        f.write_str(" right:")?;
        write_hash(f, self.right.as_ref())?;
        f.write_str("}")
    }
}

fn write_hash(f: &mut fmt::Formatter<'_>, hash: Option<&NodeHash>) -> fmt::Result {
    match hash {
        Some(hash) => f.write_str(&hex::encode(hash)),
        None => f.write_str("nil"),
    }
}

/// A path from a leaf up to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// The hash of the leaf at the bottom of the path.
    #[cfg_attr(feature = "serde", serde(with = "crate::proof::codec::hash"))]
    pub leaf_hash: NodeHash,
    /// Inner nodes on the path, ordered such that the first one is the parent of the leaf and the
    /// last one is the root.
    #[cfg_attr(feature = "serde", serde(rename = "inner_nodes"))]
    pub steps: Vec<InnerStep>,
}

impl Path {
    /// Fold the steps of this path over the leaf hash, producing the root it commits to.
    pub fn compute_root<H: NodeHasher>(&self) -> Result<NodeHash, VerifyError> {
        self.steps
            .iter()
            .try_fold(self.leaf_hash, |hash, step| step.parent_hash::<H>(hash))
    }

    /// Check that the leaf hashes to the path's leaf hash and that the path hashes up to `root`.
    pub fn replay<H: NodeHasher>(&self, leaf: &LeafData, root: &NodeHash) -> Result<(), VerifyError> {
        if H::hash_leaf(leaf) != self.leaf_hash {
            return Err(VerifyError::LeafMismatch);
        }

        if self.compute_root::<H>()? != *root {
            return Err(VerifyError::RootMismatch);
        }

        Ok(())
    }

    /// Whether this is the path of the smallest key in the tree.
    pub fn is_leftmost(&self) -> bool {
        is_leftmost(&self.steps)
    }

    /// Whether this is the path of the largest key in the tree.
    pub fn is_rightmost(&self) -> bool {
        is_rightmost(&self.steps)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in self.steps.iter().rev() {
            writeln!(f, "{}", step)?;
        }
        writeln!(f, "hash(leaf)={}", hex::encode(self.leaf_hash))
    }
}

fn is_leftmost(steps: &[InnerStep]) -> bool {
    steps.iter().all(|step| step.left.is_none())
}

fn is_rightmost(steps: &[InnerStep]) -> bool {
    steps.iter().all(|step| step.right.is_none())
}

/// Check that the leaves at the bottom of two paths through the same tree are neighbors in key
/// order, with the leaf of `left` preceding the leaf of `right`.
///
/// Both step sequences are ordered leaf to root. They are walked downwards from the root in
/// lockstep until they split. Below the split, the left path must only ever descend right and
/// the right path must only ever descend left.
pub fn check_adjacent(left: &[InnerStep], right: &[InnerStep]) -> Result<(), VerifyError> {
    let (mut left, mut right) = (left, right);

    loop {
        let (Some((left_top, left_rest)), Some((right_top, right_rest))) =
            (left.split_last(), right.split_last())
        else {
            // two distinct leaves under the same root always split before running out of steps.
            return Err(VerifyError::PathsNotAdjacent);
        };

        left = left_rest;
        right = right_rest;

        if left_top.same_siblings(right_top) {
            continue;
        }

        // this is the split. the left path must have gone left and the right path right.
        if left_top.right.is_none() || right_top.left.is_none() {
            return Err(VerifyError::PathsNotAdjacent);
        }
        break;
    }

    if is_rightmost(left) && is_leftmost(right) {
        Ok(())
    } else {
        Err(VerifyError::PathsNotAdjacent)
    }
}
