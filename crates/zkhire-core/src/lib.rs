//! ZkHire Core: Fundamental types, errors, and state machines for the
//! ZkHire eligibility-proof engine.

pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use config::{EngineConfig, ProverConfig, VerificationMode, VerifierConfig};
pub use error::CoreError;
pub use state::{
    GenerationEvent, GenerationState, GenerationStateMachine, VerificationEvent,
    VerificationState, VerificationStateMachine,
};
pub use types::{
    ApplicantId, CircuitId, EligibilityInput, GeneratedProof, Groth16Proof, JobId,
    JobPublicParameters, Nullifier, PrivacyMetrics, PrivateInputs, ProofArtifact, ProofPayload,
    PublicInputs, PublicSignals, VerificationOutcome, VerificationPath, VerificationRequest,
};
