use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use zkhire_core::{ProofPayload, VerificationRequest};

use crate::error::ProofError;

/// Private witness values handed to a proving backend.
#[derive(Clone, Serialize)]
pub struct PrivateWitness {
    pub skills: BTreeMap<String, u8>,
    pub expected_salary: u64,
    /// Hex leaf hash of the applicant's region.
    pub region_leaf: String,
    /// Hex sibling hashes from the leaf upward.
    pub region_path: Vec<String>,
    pub region_index: usize,
}

/// Public values the circuit binds the proof to.
#[derive(Debug, Clone, Serialize)]
pub struct PublicWitness {
    pub job_id_hash: String,
    pub skill_thresholds: BTreeMap<String, u8>,
    pub salary_min: u64,
    pub salary_max: u64,
    pub region_merkle_root: String,
    pub nullifier: String,
    pub timestamp: i64,
}

/// Full circuit input for one proving call.
#[derive(Clone, Serialize)]
pub struct ProvingRequest {
    pub private: PrivateWitness,
    pub public: PublicWitness,
}

// Private witness values never reach logs.
impl fmt::Debug for ProvingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvingRequest")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// What a proving backend hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvingResponse {
    pub proof: ProofPayload,
    /// Raw public signals, checked against the four-signal contract by the caller.
    pub public_signals: Vec<String>,
}

/// Ledger answer to a verification submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub verified: bool,
    pub transaction_hash: Option<String>,
}

/// External Groth16 prover.
///
/// Implementations report `artifacts_available() == false` when the circuit
/// or proving key is not configured, letting the orchestrator skip straight to
/// the fallback path.
#[async_trait]
pub trait ProvingBackend: Send + Sync {
    fn backend_id(&self) -> &str;

    fn artifacts_available(&self) -> bool;

    async fn prove(&self, request: &ProvingRequest) -> Result<ProvingResponse, ProofError>;
}

/// External verification ledger.
///
/// `Ok` with `verified == false` is a definitive rejection. `Err` means the
/// ledger could not be reached or answered garbage.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    fn backend_id(&self) -> &str;

    async fn submit(&self, request: &VerificationRequest) -> Result<LedgerReceipt, ProofError>;
}
