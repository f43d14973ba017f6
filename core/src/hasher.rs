//! Hashers (feature-gated) and utilities for implementing them.

use crate::tree::{InnerData, LeafData, NodeHash};

/// A tree node hash function.
///
/// The hashes of leaves and inner nodes must be domain-separated in some way, so that no leaf
/// preimage can be mistaken for an inner node preimage. The byte encoding must be identical
/// between the tree producing proofs and any verifier consuming them.
pub trait NodeHasher {
    /// Hash a leaf.
    fn hash_leaf(data: &LeafData) -> NodeHash;

    /// Hash an inner node.
    fn hash_inner(data: &InnerData) -> NodeHash;
}

/// A simple trait for representing binary hash functions.
pub trait BinaryHash {
    /// Given a bit-string, produce a 32-byte hash.
    fn hash(input: &[u8]) -> [u8; 32];

    /// An optional specialization of `hash` where the input is given as a sequence of
    /// slices to be concatenated.
    fn hash_concat(parts: &[&[u8]]) -> [u8; 32] {
        let len = parts.iter().map(|p| p.len()).sum();
        let mut buf = alloc::vec::Vec::with_capacity(len);
        for part in parts {
            buf.extend_from_slice(part);
        }
        Self::hash(&buf)
    }
}

/// A node hasher constructed from a simple binary hasher.
///
/// Preimages are encoded as follows, with all integers big-endian:
///   - leaf: `0u8 || 1u64 || len(key) as u64 || key || len(value) as u64 || value`
///   - inner: `height as u8 || size as u64 || left || right`
///
/// Inner nodes always have a height of at least 1, so the leading byte separates the two kinds.
pub struct BinaryHasher<H>(core::marker::PhantomData<H>);

impl<H: BinaryHash> NodeHasher for BinaryHasher<H> {
    fn hash_leaf(data: &LeafData) -> NodeHash {
        H::hash_concat(&[
            &[0u8],
            &1u64.to_be_bytes(),
            &(data.key.len() as u64).to_be_bytes(),
            &data.key,
            &(data.value.len() as u64).to_be_bytes(),
            &data.value,
        ])
    }

    fn hash_inner(data: &InnerData) -> NodeHash {
        H::hash_concat(&[
            &[data.height],
            &data.size.to_be_bytes(),
            &data.left,
            &data.right,
        ])
    }
}

#[cfg(any(feature = "blake3-hasher", test))]
pub use blake3::Blake3Hasher;

/// A node hasher making use of blake3.
#[cfg(any(feature = "blake3-hasher", test))]
pub mod blake3 {
    use super::{BinaryHash, BinaryHasher};

    /// A [`BinaryHash`] implementation for Blake3.
    pub struct Blake3BinaryHasher;

    /// A wrapper around Blake3 for use in IAVL proofs.
    pub type Blake3Hasher = BinaryHasher<Blake3BinaryHasher>;

    impl BinaryHash for Blake3BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            blake3::hash(value).into()
        }

        fn hash_concat(parts: &[&[u8]]) -> [u8; 32] {
            let mut hasher = blake3::Hasher::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().into()
        }
    }
}

#[cfg(feature = "sha2-hasher")]
pub use sha2::Sha2Hasher;

/// A node hasher making use of sha2-256.
#[cfg(feature = "sha2-hasher")]
pub mod sha2 {
    use super::{BinaryHash, BinaryHasher};
    use sha2::{Digest, Sha256};

    /// A [`BinaryHash`] implementation for Sha2.
    pub struct Sha2BinaryHasher;

    /// A wrapper around sha2-256 for use in IAVL proofs.
    pub type Sha2Hasher = BinaryHasher<Sha2BinaryHasher>;

    impl BinaryHash for Sha2BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            let mut hasher = Sha256::new();
            hasher.update(value);
            hasher.finalize().into()
        }

        fn hash_concat(parts: &[&[u8]]) -> [u8; 32] {
            let mut hasher = Sha256::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().into()
        }
    }
}
