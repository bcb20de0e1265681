use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use zkhire_core::types::{ApplicantId, JobId, Nullifier, FIELD_BYTES};

use crate::error::CryptoError;

/// Length of the nullifier secret in bytes.
pub const NULLIFIER_KEY_LEN: usize = 32;

/// Domain tag mixed into every nullifier derivation.
const NULLIFIER_DOMAIN: &[u8] = b"zkhire.nullifier.v1";

/// Secret key for nullifier derivation. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct NullifierKey([u8; NULLIFIER_KEY_LEN]);

impl NullifierKey {
    /// Generate a new random key using OS-provided entropy.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NULLIFIER_KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != NULLIFIER_KEY_LEN {
            return Err(CryptoError::InvalidKeyLength {
                expected: NULLIFIER_KEY_LEN,
                actual: bytes.len(),
            });
        }
        let mut key = [0u8; NULLIFIER_KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Parse a hex-encoded key.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let mut decoded = hex::decode(s.trim())?;
        let key = Self::from_bytes(&decoded);
        decoded.zeroize();
        key
    }

    /// Hex encoding, for writing fresh keys to config files.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for NullifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NullifierKey(<redacted>)")
    }
}

/// Derives replay-prevention nullifiers from (applicant, job) pairs.
///
/// BLAKE3 in keyed mode is a PRF: without the key nobody can compute a
/// nullifier or tell whether two nullifiers share an applicant. Both ids are
/// length-prefixed so distinct pairs never share an encoding.
#[derive(Debug, Clone)]
pub struct NullifierDeriver {
    key: NullifierKey,
}

impl NullifierDeriver {
    pub fn new(key: NullifierKey) -> Self {
        Self { key }
    }

    pub fn derive(&self, applicant: &ApplicantId, job: &JobId) -> Nullifier {
        let mut hasher = blake3::Hasher::new_keyed(&self.key.0);
        hasher.update(NULLIFIER_DOMAIN);
        for part in [applicant.as_str(), job.as_str()] {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        let digest = hasher.finalize();

        let mut truncated = [0u8; FIELD_BYTES];
        truncated.copy_from_slice(&digest.as_bytes()[..FIELD_BYTES]);
        Nullifier::from_bytes(&truncated)
    }
}
