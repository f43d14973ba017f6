//! Hex string encoding of byte strings and hashes, used only when proofs are serialized.

use crate::tree::NodeHash;

use alloc::string::String;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

fn decode_hash<'de, D: Deserializer<'de>>(s: &str) -> Result<NodeHash, D::Error> {
    let mut hash = [0u8; 32];
    hex::decode_to_slice(s, &mut hash).map_err(D::Error::custom)?;
    Ok(hash)
}

/// Arbitrary-length byte strings.
pub mod bytes {
    use super::*;
    use alloc::vec::Vec;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(D::Error::custom)
    }
}

/// 32-byte hashes.
pub mod hash {
    use super::*;

    pub fn serialize<S: Serializer>(hash: &NodeHash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeHash, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_hash::<D>(&s)
    }
}

/// Optional 32-byte hashes. `None` is encoded as null.
pub mod option_hash {
    use super::*;

    pub fn serialize<S: Serializer>(
        hash: &Option<NodeHash>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match hash {
            Some(hash) => serializer.serialize_some(&hex::encode(hash)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NodeHash>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => decode_hash::<D>(&s).map(Some),
            None => Ok(None),
        }
    }
}
