use zkhire_core::types::{FIELD_BYTES, HEX_PREFIX};

use crate::error::CryptoError;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Domain prefix for Merkle leaves.
pub const LEAF_PREFIX: u8 = 0x00;

/// Domain prefix for Merkle internal nodes.
pub const NODE_PREFIX: u8 = 0x01;

/// Key-derivation context for job identifiers placed in public signals.
pub const JOB_ID_CONTEXT: &str = "zkhire 2024 job-id field element v1";

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash a Merkle leaf: H(0x00 || data).
pub fn leaf_hash(data: &[u8]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[LEAF_PREFIX]);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

/// Hash a Merkle internal node: H(0x01 || left || right).
pub fn node_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}

/// Map data into a BN254-safe field element string under a derivation context.
///
/// The 32-byte derived value is truncated to 31 bytes so it is always below
/// the curve's scalar modulus.
pub fn field_element(context: &str, data: &[u8]) -> String {
    let derived = blake3::derive_key(context, data);
    format!("{}{}", HEX_PREFIX, hex::encode(&derived[..FIELD_BYTES]))
}

/// Field element committing to a job identifier.
pub fn job_id_hash(job_id: &str) -> String {
    field_element(JOB_ID_CONTEXT, job_id.as_bytes())
}

/// Lowercase hex encoding of a hash.
pub fn to_hex(h: &Hash) -> String {
    hex::encode(h)
}

/// Decode a 64-character hex string into a hash.
pub fn from_hex(s: &str) -> Result<Hash, CryptoError> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out)?;
    Ok(out)
}

/// Serde helpers for hex-encoded hashes.
pub mod serde_hex {
    use super::Hash;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(h: &Hash, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(h))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(d)?;
        super::from_hex(&s).map_err(serde::de::Error::custom)
    }

    /// Same encoding for a list of hashes.
    pub mod vec {
        use super::Hash;
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(hashes: &[Hash], s: S) -> Result<S::Ok, S::Error> {
            let encoded: Vec<String> = hashes.iter().map(hex::encode).collect();
            encoded.serialize(s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Hash>, D::Error> {
            let encoded = Vec::<String>::deserialize(d)?;
            encoded
                .iter()
                .map(|s| crate::hashing::from_hex(s).map_err(serde::de::Error::custom))
                .collect()
        }
    }
}
