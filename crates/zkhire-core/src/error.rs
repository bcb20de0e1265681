/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid state transition from {from} on {event}")]
    InvalidStateTransition { from: String, event: String },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid public signals: {0}")]
    InvalidSignals(String),

    #[error("malformed proof: {0}")]
    MalformedProof(String),

    #[error("invalid nullifier: {0}")]
    InvalidNullifier(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
