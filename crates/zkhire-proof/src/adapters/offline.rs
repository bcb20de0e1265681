use async_trait::async_trait;

use zkhire_core::VerificationRequest;

use crate::backend::{
    LedgerReceipt, ProvingBackend, ProvingRequest, ProvingResponse, VerificationBackend,
};
use crate::error::ProofError;

/// Prover used when no proving service is configured.
///
/// Reports missing artifacts so generation goes straight to the fallback path.
#[derive(Debug, Default)]
pub struct OfflineProver;

#[async_trait]
impl ProvingBackend for OfflineProver {
    fn backend_id(&self) -> &str {
        "offline"
    }

    fn artifacts_available(&self) -> bool {
        false
    }

    async fn prove(&self, _request: &ProvingRequest) -> Result<ProvingResponse, ProofError> {
        Err(ProofError::ProvingBackend("no proving backend configured".into()))
    }
}

/// Ledger used when no verification service is configured. Always unavailable.
#[derive(Debug, Default)]
pub struct OfflineLedger;

#[async_trait]
impl VerificationBackend for OfflineLedger {
    fn backend_id(&self) -> &str {
        "offline"
    }

    async fn submit(&self, _request: &VerificationRequest) -> Result<LedgerReceipt, ProofError> {
        Err(ProofError::VerificationBackend(
            "no verification backend configured".into(),
        ))
    }
}
