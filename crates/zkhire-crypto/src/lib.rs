//! ZkHire Crypto: Hashing, region Merkle commitments and nullifier
//! derivation for the ZkHire eligibility-proof engine.

pub mod error;
pub mod hashing;
pub mod merkle;
pub mod nullifier;

pub use error::CryptoError;
pub use hashing::{field_element, hash, job_id_hash, leaf_hash, node_hash, Hash};
pub use merkle::{MerkleProof, RegionMembershipTree};
pub use nullifier::{NullifierDeriver, NullifierKey};
