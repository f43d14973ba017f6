//! Proofs that keys are absent from the tree.

use crate::{
    hasher::NodeHasher,
    proof::{path::check_adjacent, Path, VerifyError},
    tree::{LeafData, NodeHash},
};

use core::fmt;

/// A proof that a key has no value in the tree.
///
/// The key is bounded by its predecessor (the left bound) and its successor (the right bound),
/// each proven by a path. A key smaller than every key in the tree only has a right bound, which
/// must then be the leftmost leaf. Symmetrically, a key greater than every key in the tree only
/// has a left bound, which must be the rightmost leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonExistenceProof {
    /// The root the proof was built against.
    #[cfg_attr(feature = "serde", serde(with = "crate::proof::codec::hash"))]
    pub root_hash: NodeHash,
    /// The path to the greatest key smaller than the proven key.
    pub left_path: Option<Path>,
    /// The leaf at the end of `left_path`.
    pub left_node: Option<LeafData>,
    /// The path to the smallest key greater than the proven key.
    pub right_path: Option<Path>,
    /// The leaf at the end of `right_path`.
    pub right_node: Option<LeafData>,
}

impl NonExistenceProof {
    /// Verify that `key` has no value in the tree with the given root.
    pub fn verify<H: NodeHasher>(&self, key: &[u8], root: &NodeHash) -> Result<(), VerifyError> {
        if self.root_hash != *root {
            return Err(VerifyError::RootMismatch);
        }

        if self.left_path.is_none() && self.right_path.is_none() {
            return Err(VerifyError::MissingBound);
        }

        let left = bound::<H>(&self.left_path, &self.left_node, root)
            .map_err(|_| VerifyError::LeftBoundInvalid)?;
        if let Some((_, leaf)) = left {
            if leaf.key.as_slice() >= key {
                return Err(VerifyError::BoundOrderingViolation);
            }
        }

        let right = bound::<H>(&self.right_path, &self.right_node, root)
            .map_err(|_| VerifyError::RightBoundInvalid)?;
        if let Some((_, leaf)) = right {
            if leaf.key.as_slice() <= key {
                return Err(VerifyError::BoundOrderingViolation);
            }
        }

        match (left, right) {
            (Some((left_path, _)), Some((right_path, _))) => {
                check_adjacent(&left_path.steps, &right_path.steps)
            }
            (None, Some((right_path, _))) if !right_path.is_leftmost() => {
                Err(VerifyError::NotLeftBoundary)
            }
            (Some((left_path, _)), None) if !left_path.is_rightmost() => {
                Err(VerifyError::NotRightBoundary)
            }
            _ => Ok(()),
        }
    }
}

// Verify one side of the proof. A leaf without its path is ignored, a path without its leaf is
// invalid.
fn bound<'a, H: NodeHasher>(
    path: &'a Option<Path>,
    leaf: &'a Option<LeafData>,
    root: &NodeHash,
) -> Result<Option<(&'a Path, &'a LeafData)>, VerifyError> {
    match (path, leaf) {
        (None, _) => Ok(None),
        (Some(path), Some(leaf)) => {
            path.replay::<H>(leaf, root)?;
            Ok(Some((path, leaf)))
        }
        (Some(_), None) => Err(VerifyError::MissingBound),
    }
}

impl fmt::Display for NonExistenceProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NonExistenceProof")?;
        writeln!(f, "root={}", hex::encode(self.root_hash))?;
        write_bound(f, "left", &self.left_path, &self.left_node)?;
        write_bound(f, "right", &self.right_path, &self.right_node)
    }
}

fn write_bound(
    f: &mut fmt::Formatter<'_>,
    side: &str,
    path: &Option<Path>,
    leaf: &Option<LeafData>,
) -> fmt::Result {
    write!(f, "{}=", side)?;
    if let Some(path) = path {
        write!(f, "{}", path)?;
    }
    match leaf {
        Some(leaf) => writeln!(
            f,
            "key={} value={}",
            hex::encode(&leaf.key),
            hex::encode(&leaf.value)
        ),
        None => writeln!(f, "nil"),
    }
}
