//! ZkHire Proof: Eligibility checking, proof generation and verification.
//!
//! Provides:
//! - Local eligibility checks against job requirements
//! - Real-then-fallback proof generation over a pluggable prover
//! - Ledger verification with a strict or permissive structural fallback
//! - Privacy scoring of disclosed information

pub mod adapters;
pub mod backend;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod generator;
pub mod privacy;
pub mod verifier;

pub use backend::{LedgerReceipt, ProvingBackend, ProvingRequest, ProvingResponse, VerificationBackend};
pub use eligibility::{EligibilityChecker, EligibilityReport, Violation};
pub use engine::EligibilityEngine;
pub use error::ProofError;
pub use generator::{GenerationRequest, ProofOrchestrator};
pub use privacy::PrivacyScorer;
pub use verifier::VerificationOrchestrator;
