use std::sync::Arc;

use zkhire_core::{
    ApplicantId, EligibilityInput, EngineConfig, GeneratedProof, JobId, Nullifier,
    PrivacyMetrics, VerificationMode, VerificationOutcome, VerificationRequest,
};
use zkhire_crypto::{MerkleProof, NullifierDeriver, NullifierKey, RegionMembershipTree};

use crate::adapters::{HttpLedgerBackend, HttpProvingBackend, OfflineLedger, OfflineProver};
use crate::backend::{ProvingBackend, VerificationBackend};
use crate::eligibility::{EligibilityChecker, EligibilityReport};
use crate::error::ProofError;
use crate::generator::{GenerationRequest, ProofOrchestrator};
use crate::privacy::PrivacyScorer;
use crate::verifier::VerificationOrchestrator;

/// Single entry point bundling every engine operation.
pub struct EligibilityEngine {
    deriver: NullifierDeriver,
    generator: ProofOrchestrator,
    verifier: VerificationOrchestrator,
}

impl EligibilityEngine {
    pub fn new(
        deriver: NullifierDeriver,
        generator: ProofOrchestrator,
        verifier: VerificationOrchestrator,
    ) -> Self {
        Self {
            deriver,
            generator,
            verifier,
        }
    }

    /// Wire HTTP backends where endpoints are configured, offline ones elsewhere.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ProofError> {
        if config.nullifier_key.trim().is_empty() {
            return Err(ProofError::Validation("nullifier_key is not configured".into()));
        }
        let key = NullifierKey::from_hex(&config.nullifier_key)?;

        let prover: Arc<dyn ProvingBackend> = match HttpProvingBackend::from_config(&config.prover)? {
            Some(http) => Arc::new(http),
            None => Arc::new(OfflineProver),
        };
        let ledger: Arc<dyn VerificationBackend> =
            match HttpLedgerBackend::from_config(&config.verifier)? {
                Some(http) => Arc::new(http),
                None => Arc::new(OfflineLedger),
            };

        tracing::info!(
            prover = prover.backend_id(),
            ledger = ledger.backend_id(),
            mode = %config.verifier.mode,
            "eligibility engine configured"
        );

        Ok(Self::new(
            NullifierDeriver::new(key),
            ProofOrchestrator::new(prover, config.prover.timeout()),
            VerificationOrchestrator::new(ledger, config.verifier.timeout(), config.verifier.mode),
        ))
    }

    pub fn check(&self, input: &EligibilityInput) -> EligibilityReport {
        EligibilityChecker::check(input)
    }

    pub fn derive_nullifier(&self, applicant: &ApplicantId, job: &JobId) -> Nullifier {
        self.deriver.derive(applicant, job)
    }

    pub fn region_root(&self, regions: &[String]) -> String {
        RegionMembershipTree::root_hex(regions)
    }

    pub fn region_proof(&self, region: &str, regions: &[String]) -> MerkleProof {
        RegionMembershipTree::get_proof(region, regions)
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedProof, ProofError> {
        self.generator.generate(request).await
    }

    pub async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome {
        self.verifier.verify(request).await
    }

    pub fn score(&self, metrics: &PrivacyMetrics) -> u8 {
        PrivacyScorer::score(metrics)
    }

    pub fn verification_mode(&self) -> VerificationMode {
        self.verifier.mode()
    }
}
