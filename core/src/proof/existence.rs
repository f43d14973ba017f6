//! Proofs that keys are present in the tree.

use crate::{
    hasher::NodeHasher,
    proof::{Path, VerifyError},
    tree::{LeafData, NodeHash},
};

use alloc::vec::Vec;

/// A proof that a single key maps to a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExistenceProof {
    /// The path from the leaf holding the key to the root.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub path: Path,
    /// The root the proof was built against.
    #[cfg_attr(feature = "serde", serde(with = "crate::proof::codec::hash"))]
    pub root_hash: NodeHash,
}

impl ExistenceProof {
    /// Verify that `key` maps to `value` in the tree with the given root.
    pub fn verify<H: NodeHasher>(
        &self,
        key: &[u8],
        value: &[u8],
        root: &NodeHash,
    ) -> Result<(), VerifyError> {
        if self.root_hash != *root {
            return Err(VerifyError::RootMismatch);
        }

        self.path.replay::<H>(&LeafData::new(key, value), root)
    }
}

/// A proof that a contiguous range of keys is present in the tree.
///
/// Verification of range proofs is not implemented. [`RangeExistenceProof::verify`] rejects
/// every input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeExistenceProof {
    /// The root the proof was built against.
    #[cfg_attr(feature = "serde", serde(with = "crate::proof::codec::hash"))]
    pub root_hash: NodeHash,
    /// Paths to each key in the range.
    pub paths: Vec<Path>,
}

impl RangeExistenceProof {
    /// Always fails with [`VerifyError::RangeProofUnsupported`].
    pub fn verify<H: NodeHasher>(
        &self,
        _key: &[u8],
        _value: &[u8],
        _root: &NodeHash,
    ) -> Result<(), VerifyError> {
        Err(VerifyError::RangeProofUnsupported)
    }
}
