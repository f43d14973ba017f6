use core::fmt;

/// Errors in proof verification.
///
/// Any single failed check rejects the whole proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// The leaf does not hash to the leaf hash recorded in the path.
    LeafMismatch,
    /// The root hash mismatched, either the one carried by the proof or the one computed from
    /// the path.
    RootMismatch,
    /// An inner step did not carry exactly one sibling.
    MalformedStep,
    /// A non-existence proof carried neither a left nor a right bound.
    MissingBound,
    /// The left bound of a non-existence proof did not verify.
    LeftBoundInvalid,
    /// The right bound of a non-existence proof did not verify.
    RightBoundInvalid,
    /// A bound was not strictly on its side of the key.
    BoundOrderingViolation,
    /// The two bounds of a non-existence proof are not neighbors.
    PathsNotAdjacent,
    /// Only a right bound was given but it is not the smallest key in the tree.
    NotLeftBoundary,
    /// Only a left bound was given but it is not the largest key in the tree.
    NotRightBoundary,
    /// Range proofs cannot be verified.
    RangeProofUnsupported,
    /// An existence proof was given for an absent value or vice versa.
    UnexpectedProofKind,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::LeafMismatch => f.write_str("leaf hash does not match"),
            VerifyError::RootMismatch => f.write_str("path does not match supplied root"),
            VerifyError::MalformedStep => f.write_str("inner step must have exactly one sibling"),
            VerifyError::MissingBound => f.write_str("at least one path must exist"),
            VerifyError::LeftBoundInvalid => f.write_str("failed to verify left path"),
            VerifyError::RightBoundInvalid => f.write_str("failed to verify right path"),
            VerifyError::BoundOrderingViolation => {
                f.write_str("bounding keys must be strictly on either side of the supplied key")
            }
            VerifyError::PathsNotAdjacent => f.write_str("merkle paths are not adjacent"),
            VerifyError::NotLeftBoundary => {
                f.write_str("right path is the only one but not leftmost")
            }
            VerifyError::NotRightBoundary => {
                f.write_str("left path is the only one but not rightmost")
            }
            VerifyError::RangeProofUnsupported => {
                f.write_str("range proofs are not supported")
            }
            VerifyError::UnexpectedProofKind => {
                f.write_str("proof kind does not match the expected value")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VerifyError {}

/// Errors in proof construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProveError {
    /// The tree has no root.
    EmptyTree,
    /// A node on the walked path has no computed hash.
    UncomputedTree,
    /// An existence proof was requested for an absent key.
    KeyNotFound,
    /// A non-existence proof was requested for a present key.
    KeyAlreadyExists,
    /// Neither a predecessor nor a successor of the key could be found.
    NoBounds,
    /// Heights did not strictly decrease while descending the tree.
    MalformedTree,
    /// The tree is taller than proofs are allowed to be.
    HeightLimitExceeded {
        /// The height of the tree.
        height: u8,
        /// The configured limit.
        limit: u8,
    },
    /// A freshly constructed proof did not verify against the tree's own root.
    SelfCheckFailed(VerifyError),
}

impl fmt::Display for ProveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProveError::EmptyTree => f.write_str("tree root is nil"),
            ProveError::UncomputedTree => f.write_str("tree hashes have not been computed"),
            ProveError::KeyNotFound => f.write_str("key does not exist"),
            ProveError::KeyAlreadyExists => {
                f.write_str("couldn't construct non-existence proof: key exists")
            }
            ProveError::NoBounds => {
                f.write_str("couldn't get keys required for non-existence proof")
            }
            ProveError::MalformedTree => f.write_str("node heights do not decrease along path"),
            ProveError::HeightLimitExceeded { height, limit } => {
                write!(f, "tree height {} exceeds limit {}", height, limit)
            }
            ProveError::SelfCheckFailed(e) => write!(f, "constructed proof is invalid: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProveError::SelfCheckFailed(e) => Some(e),
            _ => None,
        }
    }
}
