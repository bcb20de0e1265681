use zkhire_core::CoreError;
use zkhire_crypto::CryptoError;

/// Proof engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("proving backend unavailable: {0}")]
    ProvingBackend(String),

    #[error("verification backend unavailable: {0}")]
    VerificationBackend(String),

    #[error("malformed proof: {0}")]
    Malformed(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl From<CoreError> for ProofError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MalformedProof(_) | CoreError::InvalidSignals(_) => {
                Self::Malformed(e.to_string())
            }
            other => Self::Validation(other.to_string()),
        }
    }
}
