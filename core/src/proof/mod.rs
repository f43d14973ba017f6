//! Tree proofs and proof verification.
//!
//! The IAVL tree is an authenticated data structure: every node commits to its children and the
//! root commits to the whole tree. This module exposes the types needed to prove that a key is
//! present with a value ([`ExistenceProof`]), that a key is absent ([`NonExistenceProof`]), or
//! either of the two ([`KeyProof`]), along with their construction from a live tree ([`prove`]).
//!
//! Verification is stateless. It needs only the proof, the claimed key and value, a trusted root
//! and a [`NodeHasher`](crate::hasher::NodeHasher).

pub use error::{ProveError, VerifyError};
pub use existence::{ExistenceProof, RangeExistenceProof};
pub use non_existence::NonExistenceProof;
pub use path::{check_adjacent, InnerStep, Path};
pub use prove::{prove, prove_existence, prove_non_existence};

use crate::{hasher::NodeHasher, tree::NodeHash};

mod error;
mod existence;
mod non_existence;
mod path;
mod prove;

#[cfg(feature = "serde")]
pub mod codec;

/// A proof about a single key: either that it is present or that it is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KeyProof {
    /// The key is present.
    Existence(ExistenceProof),
    /// The key is absent.
    NonExistence(NonExistenceProof),
}

impl KeyProof {
    /// The root the proof was built against.
    pub fn root_hash(&self) -> NodeHash {
        match self {
            KeyProof::Existence(proof) => proof.root_hash,
            KeyProof::NonExistence(proof) => proof.root_hash,
        }
    }

    /// Verify the proof for `key`. `value` is the expected value, or `None` if the key is expected
    /// to be absent.
    ///
    /// Fails with [`VerifyError::UnexpectedProofKind`] if the kind of proof does not match
    /// the expectation.
    pub fn verify<H: NodeHasher>(
        &self,
        key: &[u8],
        value: Option<&[u8]>,
        root: &NodeHash,
    ) -> Result<(), VerifyError> {
        match (self, value) {
            (KeyProof::Existence(proof), Some(value)) => proof.verify::<H>(key, value, root),
            (KeyProof::NonExistence(proof), None) => proof.verify::<H>(key, root),
            _ => Err(VerifyError::UnexpectedProofKind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExistenceProof, InnerStep, KeyProof, NonExistenceProof, Path, VerifyError};
    use crate::{
        hasher::{Blake3Hasher, NodeHasher},
        tree::{InnerData, LeafData},
    };

    // "a" -> "1", "c" -> "3"
    fn two_leaf() -> (Path, Path, [u8; 32]) {
        let a = Blake3Hasher::hash_leaf(&LeafData::new(b"a", b"1"));
        let c = Blake3Hasher::hash_leaf(&LeafData::new(b"c", b"3"));
        let root = Blake3Hasher::hash_inner(&InnerData {
            height: 1,
            size: 2,
            left: a,
            right: c,
        });
        let a_path = Path {
            leaf_hash: a,
            steps: vec![InnerStep {
                height: 1,
                size: 2,
                left: None,
                right: Some(c),
            }],
        };
        let c_path = Path {
            leaf_hash: c,
            steps: vec![InnerStep {
                height: 1,
                size: 2,
                left: Some(a),
                right: None,
            }],
        };
        (a_path, c_path, root)
    }

    #[test]
    fn dispatch_on_expected_value() {
        let (a_path, c_path, root) = two_leaf();
        let existence = KeyProof::Existence(ExistenceProof {
            path: a_path.clone(),
            root_hash: root,
        });
        let absence = KeyProof::NonExistence(NonExistenceProof {
            root_hash: root,
            left_path: Some(a_path),
            left_node: Some(LeafData::new(b"a", b"1")),
            right_path: Some(c_path),
            right_node: Some(LeafData::new(b"c", b"3")),
        });

        assert_eq!(existence.root_hash(), root);
        assert_eq!(absence.root_hash(), root);

        existence
            .verify::<Blake3Hasher>(b"a", Some(&b"1"[..]), &root)
            .unwrap();
        absence.verify::<Blake3Hasher>(b"b", None, &root).unwrap();

        assert_eq!(
            existence.verify::<Blake3Hasher>(b"a", None, &root),
            Err(VerifyError::UnexpectedProofKind)
        );
        assert_eq!(
            absence.verify::<Blake3Hasher>(b"b", Some(&b"2"[..]), &root),
            Err(VerifyError::UnexpectedProofKind)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_wire_names() {
        let (a_path, _, root) = two_leaf();
        let proof = KeyProof::Existence(ExistenceProof {
            path: a_path,
            root_hash: root,
        });

        let json = serde_json::to_value(&proof).unwrap();
        let inner = &json["existence"];
        assert_eq!(inner["root_hash"], hex::encode(root));
        assert_eq!(inner["inner_nodes"][0]["height"], 1);
        assert_eq!(inner["inner_nodes"][0]["size"], 2);
        assert!(inner["inner_nodes"][0]["left"].is_null());
        assert!(inner["leaf_hash"].is_string());

        let decoded: KeyProof = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, proof);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_omitted_sibling_is_none() {
        let (a_path, c_path, root) = two_leaf();

        let json = serde_json::json!({
            "root_hash": hex::encode(root),
            "leaf_hash": hex::encode(c_path.leaf_hash),
            "inner_nodes": [{
                "height": 1,
                "size": 2,
                "left": hex::encode(a_path.leaf_hash),
            }],
        });
        let decoded: ExistenceProof = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.path, c_path);
        decoded.verify::<Blake3Hasher>(b"c", b"3", &root).unwrap();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_absent_bound_is_null() {
        let (a_path, _, root) = two_leaf();
        let proof = NonExistenceProof {
            root_hash: root,
            left_path: None,
            left_node: None,
            right_path: Some(a_path),
            right_node: Some(LeafData::new(b"a", b"1")),
        };

        let json = serde_json::to_value(&proof).unwrap();
        assert!(json["left_path"].is_null());
        assert!(json["left_node"].is_null());
        assert_eq!(json["right_node"]["key"], hex::encode(b"a"));
        assert_eq!(json["right_node"]["value"], hex::encode(b"1"));

        let decoded: NonExistenceProof = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, proof);
        decoded.verify::<Blake3Hasher>(b"0", &root).unwrap();
    }
}
