use std::sync::Arc;
use std::time::Duration;

use zkhire_core::{
    CircuitId, EligibilityInput, GeneratedProof, GenerationEvent, GenerationState,
    GenerationStateMachine, Groth16Proof, Nullifier, ProofArtifact, ProofPayload, PublicSignals,
};
use zkhire_crypto::hashing::{self, leaf_hash};
use zkhire_crypto::RegionMembershipTree;

use crate::backend::{PrivateWitness, ProvingBackend, ProvingRequest, PublicWitness};
use crate::eligibility::EligibilityChecker;
use crate::error::ProofError;

/// Derivation context for placeholder proof coordinates.
const FALLBACK_CONTEXT: &str = "zkhire 2024 fallback proof coordinate v1";

/// One proof generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub input: EligibilityInput,
    pub nullifier: Nullifier,
    /// Unix seconds; the current time when absent.
    pub timestamp: Option<i64>,
}

struct Prepared {
    witness: ProvingRequest,
    signals: PublicSignals,
}

/// Drives the real-then-fallback generation strategy.
///
/// Once the input validates, `generate` always yields a proof: any prover
/// failure (missing artifacts, unreachable service, timeout, a response that
/// breaks the four-signal contract) lands on the fallback path.
pub struct ProofOrchestrator {
    prover: Arc<dyn ProvingBackend>,
    timeout: Duration,
}

impl ProofOrchestrator {
    pub fn new(prover: Arc<dyn ProvingBackend>, timeout: Duration) -> Self {
        Self { prover, timeout }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedProof, ProofError> {
        let state = GenerationState::Init;

        let prepared = match prepare(request) {
            Ok(p) => p,
            Err(e) => {
                GenerationStateMachine::transition(state, GenerationEvent::InputRejected)?;
                tracing::warn!(error = %e, "proof generation input rejected");
                return Err(e);
            }
        };

        let state = if self.prover.artifacts_available() {
            let state =
                GenerationStateMachine::transition(state, GenerationEvent::ArtifactsAvailable)?;
            match self.attempt_real(&prepared).await {
                Ok(artifact) => {
                    GenerationStateMachine::transition(state, GenerationEvent::RealSucceeded)?;
                    tracing::info!(
                        backend = self.prover.backend_id(),
                        circuit = %artifact.circuit_id,
                        eligible = artifact.public_signals.eligible,
                        "real proof generated"
                    );
                    return Ok(GeneratedProof::Real(artifact));
                }
                Err(e) => {
                    tracing::warn!(
                        backend = self.prover.backend_id(),
                        error = %e,
                        "proving backend failed, using fallback proof"
                    );
                    GenerationStateMachine::transition(state, GenerationEvent::RealFailed)?
                }
            }
        } else {
            tracing::debug!("circuit artifacts unavailable, using fallback proof");
            GenerationStateMachine::transition(state, GenerationEvent::ArtifactsMissing)?
        };

        let artifact = build_artifact(
            fallback_proof(&prepared.signals),
            prepared.signals,
            CircuitId::FallbackEligibilityV1,
        );
        GenerationStateMachine::transition(state, GenerationEvent::FallbackBuilt)?;

        tracing::info!(
            circuit = %artifact.circuit_id,
            eligible = artifact.public_signals.eligible,
            "fallback proof generated"
        );
        Ok(GeneratedProof::Fallback(artifact))
    }

    async fn attempt_real(&self, prepared: &Prepared) -> Result<ProofArtifact, ProofError> {
        let response = tokio::time::timeout(self.timeout, self.prover.prove(&prepared.witness))
            .await
            .map_err(|_| {
                ProofError::ProvingBackend(format!(
                    "timed out after {} ms",
                    self.timeout.as_millis()
                ))
            })??;

        response.proof.validate_shape()?;
        let signals = PublicSignals::try_from(response.public_signals)?;
        if signals != prepared.signals {
            return Err(ProofError::Malformed(
                "public signals do not match the proving request".into(),
            ));
        }

        Ok(build_artifact(
            response.proof,
            signals,
            CircuitId::RealEligibilityV1,
        ))
    }
}

fn prepare(request: &GenerationRequest) -> Result<Prepared, ProofError> {
    let input = &request.input;
    input.validate()?;
    let job_id = input.public.job_id()?;
    let public = &input.public;

    let committed_root = RegionMembershipTree::root_hex(&public.allowed_regions);
    if public.restricts_region() && !committed_root.eq_ignore_ascii_case(&public.region_merkle_root)
    {
        return Err(ProofError::Validation(
            "region_merkle_root does not commit to allowed_regions".into(),
        ));
    }

    let timestamp = request
        .timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp());
    if timestamp < 0 {
        return Err(ProofError::Validation("timestamp must not be negative".into()));
    }

    let report = EligibilityChecker::check(input);
    let region = &input.private.region;
    let region_proof = RegionMembershipTree::get_proof(region, &public.allowed_regions);

    let signals = PublicSignals {
        job_id_hash: hashing::job_id_hash(job_id.as_str()),
        nullifier: request.nullifier.as_str().to_string(),
        eligible: report.eligible,
        timestamp,
    };

    let witness = ProvingRequest {
        private: PrivateWitness {
            skills: input.private.skills.clone(),
            expected_salary: input.private.expected_salary,
            region_leaf: hashing::to_hex(&leaf_hash(region.as_bytes())),
            region_path: region_proof
                .sibling_hashes
                .iter()
                .map(hashing::to_hex)
                .collect(),
            region_index: region_proof.leaf_index,
        },
        public: PublicWitness {
            job_id_hash: signals.job_id_hash.clone(),
            skill_thresholds: public.skill_thresholds.clone(),
            salary_min: public.salary_min,
            salary_max: public.salary_max,
            region_merkle_root: committed_root,
            nullifier: signals.nullifier.clone(),
            timestamp,
        },
    };

    Ok(Prepared { witness, signals })
}

fn build_artifact(proof: ProofPayload, signals: PublicSignals, circuit_id: CircuitId) -> ProofArtifact {
    ProofArtifact {
        proof_hash: artifact_hash(&proof, &signals),
        proof,
        public_signals: signals,
        circuit_id,
    }
}

/// Curve-point-shaped placeholder, deterministic in the public signals.
///
/// Carries no cryptographic weight; it only keeps the proof shape uniform so
/// downstream consumers handle both paths identically.
fn fallback_proof(signals: &PublicSignals) -> ProofPayload {
    let seed = signals.to_vec().join("|");
    let coord = |i: u8| {
        let mut data = seed.as_bytes().to_vec();
        data.push(i);
        hashing::field_element(FALLBACK_CONTEXT, &data)
    };

    ProofPayload::Groth16Bn254(Groth16Proof {
        pi_a: [coord(0), coord(1), "1".into()],
        pi_b: [
            [coord(2), coord(3)],
            [coord(4), coord(5)],
            ["1".into(), "0".into()],
        ],
        pi_c: [coord(6), coord(7), "1".into()],
    })
}

/// BLAKE3 over the length-prefixed proof coordinates and public signals.
pub fn artifact_hash(proof: &ProofPayload, signals: &PublicSignals) -> String {
    let mut buf = Vec::new();
    let mut push = |s: &str| {
        buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
    };

    push(proof.scheme());
    match proof {
        ProofPayload::Groth16Bn254(p) => {
            for coord in p.pi_a.iter().chain(p.pi_b.iter().flatten()).chain(p.pi_c.iter()) {
                push(coord);
            }
        }
    }
    for signal in signals.to_vec() {
        push(&signal);
    }

    hashing::to_hex(&hashing::hash(&buf))
}
