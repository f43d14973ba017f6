//! An in-memory IAVL tree which hands out Merkle proofs of membership and non-membership.
//!
//! The proof types and their stateless verification live in [`iavl_core`] and are re-exported
//! here. [`MemoryTree`] is a complete tree implementation to build proofs against.
//!
//! ```no_run
//! use iavl::{Blake3Hasher, MemoryTree, Options};
//!
//! let mut tree = MemoryTree::<Blake3Hasher>::from_entries(
//!     Options::new(),
//!     vec![(b"apple".to_vec(), b"1".to_vec()), (b"pear".to_vec(), b"2".to_vec())],
//! );
//! let root = tree.commit().unwrap();
//! let proof = tree.prove_absence(b"mango").unwrap();
//! proof.verify::<Blake3Hasher>(b"mango", &root).unwrap();
//! ```

#![warn(missing_docs)]

pub use iavl_core::proof::{
    check_adjacent, ExistenceProof, InnerStep, KeyProof, NonExistenceProof, Path, ProveError,
    RangeExistenceProof, VerifyError,
};
pub use iavl_core::tree::{Cursor, InnerData, LeafData, NodeHash, NodeView, Snapshot};
pub use iavl_core::{hasher, proof};

#[cfg(feature = "blake3-hasher")]
pub use iavl_core::hasher::Blake3Hasher;
#[cfg(feature = "sha2-hasher")]
pub use iavl_core::hasher::Sha2Hasher;
pub use iavl_core::hasher::NodeHasher;

pub use memory::{MemoryCursor, MemoryTree};
pub use options::Options;

mod memory;
mod options;
