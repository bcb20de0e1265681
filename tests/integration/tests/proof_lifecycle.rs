//! Integration test: full generate-then-verify lifecycle against a mock
//! proving service and ledger over HTTP.

use zkhire_core::{
    EngineConfig, GeneratedProof, JobPublicParameters, ProverConfig, VerificationMode,
    VerificationPath, VerificationRequest, VerifierConfig,
};
use zkhire_crypto::{job_id_hash, RegionMembershipTree};
use zkhire_integration_tests::{
    nullifier_for, sample_input, scenario_regions, test_key_hex, ArtifactFiles, LedgerBehavior,
    MockService, ProverBehavior, JOB_ID,
};
use zkhire_proof::{EligibilityEngine, GenerationRequest};

fn engine_for(
    mock: &MockService,
    files: &ArtifactFiles,
    mode: VerificationMode,
) -> EligibilityEngine {
    EligibilityEngine::from_config(&EngineConfig {
        nullifier_key: test_key_hex(),
        prover: ProverConfig {
            endpoint: Some(mock.endpoint()),
            circuit_path: Some(files.circuit.clone()),
            proving_key_path: Some(files.proving_key.clone()),
            timeout_ms: 5_000,
        },
        verifier: VerifierConfig {
            endpoint: Some(mock.endpoint()),
            timeout_ms: 5_000,
            mode,
        },
    })
    .expect("engine")
}

fn request(rust: u8, region: &str, applicant: &str) -> GenerationRequest {
    GenerationRequest {
        input: sample_input(rust, region, 120_000),
        nullifier: nullifier_for(applicant, JOB_ID),
        timestamp: Some(1_717_171_717),
    }
}

fn job() -> JobPublicParameters {
    JobPublicParameters {
        job_id: JOB_ID.into(),
        region_merkle_root: Some(RegionMembershipTree::root_hex(&scenario_regions())),
    }
}

fn submission(proof: &GeneratedProof) -> VerificationRequest {
    VerificationRequest::from_artifact(proof.artifact(), job()).expect("submission")
}

// =========================================================================
// Generation
// =========================================================================

#[tokio::test]
async fn test_real_proof_from_honest_prover() {
    let mock = MockService::spawn(ProverBehavior::Honest, LedgerBehavior::Accept).await;
    let files = ArtifactFiles::create();
    let engine = engine_for(&mock, &files, VerificationMode::Strict);

    let proof = engine.generate(&request(90, "US-NY", "alice")).await.unwrap();
    assert!(proof.is_cryptographic());
    assert_eq!(mock.prove_calls(), 1);

    let signals = &proof.artifact().public_signals;
    assert!(signals.eligible);
    assert_eq!(signals.job_id_hash, job_id_hash(JOB_ID));
    assert_eq!(signals.nullifier, nullifier_for("alice", JOB_ID).as_str());
    assert_eq!(signals.timestamp, 1_717_171_717);
}

#[tokio::test]
async fn test_ineligible_applicant_gets_real_proof_with_zero_flag() {
    let mock = MockService::spawn(ProverBehavior::Honest, LedgerBehavior::Accept).await;
    let files = ArtifactFiles::create();
    let engine = engine_for(&mock, &files, VerificationMode::Strict);

    let proof = engine.generate(&request(90, "FR-IDF", "bob")).await.unwrap();
    assert!(proof.is_cryptographic());
    assert!(!proof.artifact().public_signals.eligible);
}

#[tokio::test]
async fn test_misbehaving_prover_falls_back() {
    for behavior in [
        ProverBehavior::ServerError,
        ProverBehavior::ShortSignals,
        ProverBehavior::Garbage,
    ] {
        let mock = MockService::spawn(behavior, LedgerBehavior::Accept).await;
        let files = ArtifactFiles::create();
        let engine = engine_for(&mock, &files, VerificationMode::Strict);

        let proof = engine.generate(&request(90, "US-CA", "carol")).await.unwrap();
        assert!(!proof.is_cryptographic(), "{:?} should fall back", behavior);
        assert_eq!(mock.prove_calls(), 1);
        assert_eq!(proof.artifact().public_signals.to_vec().len(), 4);
        assert!(proof.artifact().public_signals.eligible);
    }
}

#[tokio::test]
async fn test_missing_artifacts_skip_prover() {
    let mock = MockService::spawn(ProverBehavior::Honest, LedgerBehavior::Accept).await;
    let files = ArtifactFiles::create();
    let engine = engine_for(&mock, &files, VerificationMode::Strict);
    std::fs::remove_file(&files.proving_key).unwrap();

    let proof = engine.generate(&request(90, "US-CA", "dave")).await.unwrap();
    assert!(!proof.is_cryptographic());
    assert_eq!(mock.prove_calls(), 0);
}

// =========================================================================
// Verification
// =========================================================================

#[tokio::test]
async fn test_ledger_accepts_real_proof() {
    let mock = MockService::spawn(ProverBehavior::Honest, LedgerBehavior::Accept).await;
    let files = ArtifactFiles::create();
    let engine = engine_for(&mock, &files, VerificationMode::Strict);

    let proof = engine.generate(&request(90, "US-NY", "erin")).await.unwrap();
    let outcome = engine.verify(&submission(&proof)).await;

    assert!(outcome.valid);
    assert!(outcome.eligible);
    assert_eq!(outcome.path, VerificationPath::Network);
    assert!(outcome.transaction_hash.is_some());
    assert_eq!(mock.verify_calls(), 1);
}

#[tokio::test]
async fn test_ledger_rejection_is_final() {
    let mock = MockService::spawn(ProverBehavior::Honest, LedgerBehavior::Reject).await;
    let files = ArtifactFiles::create();
    let engine = engine_for(&mock, &files, VerificationMode::Permissive);

    let proof = engine.generate(&request(90, "US-NY", "frank")).await.unwrap();
    let outcome = engine.verify(&submission(&proof)).await;

    assert!(!outcome.valid);
    assert_eq!(outcome.path, VerificationPath::Rejected);
    assert_eq!(outcome.error.as_deref(), Some("proof rejected by ledger"));
}

#[tokio::test]
async fn test_unavailable_ledger_strict_rejects() {
    for behavior in [LedgerBehavior::ServerError, LedgerBehavior::Garbage] {
        let mock = MockService::spawn(ProverBehavior::Honest, behavior).await;
        let files = ArtifactFiles::create();
        let engine = engine_for(&mock, &files, VerificationMode::Strict);

        let proof = engine.generate(&request(90, "US-NY", "grace")).await.unwrap();
        let outcome = engine.verify(&submission(&proof)).await;

        assert!(!outcome.valid, "{:?} should fail closed", behavior);
        assert_eq!(outcome.path, VerificationPath::Rejected);
        assert!(outcome
            .error
            .as_deref()
            .unwrap_or_default()
            .starts_with("verification backend unavailable"));
    }
}

#[tokio::test]
async fn test_unavailable_ledger_permissive_accepts_structure() {
    for behavior in [LedgerBehavior::ServerError, LedgerBehavior::Garbage] {
        let mock = MockService::spawn(ProverBehavior::Honest, behavior).await;
        let files = ArtifactFiles::create();
        let engine = engine_for(&mock, &files, VerificationMode::Permissive);

        let proof = engine.generate(&request(90, "US-NY", "heidi")).await.unwrap();
        let outcome = engine.verify(&submission(&proof)).await;

        assert!(outcome.valid);
        assert!(outcome.eligible);
        assert_eq!(outcome.path, VerificationPath::Structural);
        assert!(outcome.transaction_hash.is_none());
    }
}

#[tokio::test]
async fn test_tampered_signal_never_reaches_ledger() {
    let mock = MockService::spawn(ProverBehavior::Honest, LedgerBehavior::Accept).await;
    let files = ArtifactFiles::create();
    let engine = engine_for(&mock, &files, VerificationMode::Permissive);

    let proof = engine.generate(&request(90, "US-NY", "ivan")).await.unwrap();
    let mut tampered = submission(&proof);
    tampered.public_signals[2] = "yes".into();

    let outcome = engine.verify(&tampered).await;
    assert!(!outcome.valid);
    assert_eq!(outcome.path, VerificationPath::Rejected);
    assert_eq!(mock.verify_calls(), 0);
}

#[tokio::test]
async fn test_proof_for_other_job_rejected() {
    let mock = MockService::spawn(ProverBehavior::Honest, LedgerBehavior::Accept).await;
    let files = ArtifactFiles::create();
    let engine = engine_for(&mock, &files, VerificationMode::Strict);

    let proof = engine.generate(&request(90, "US-NY", "judy")).await.unwrap();
    let other_job = JobPublicParameters {
        job_id: "job-frontend-7".into(),
        region_merkle_root: None,
    };
    let submission = VerificationRequest::from_artifact(proof.artifact(), other_job).unwrap();

    let outcome = engine.verify(&submission).await;
    assert!(!outcome.valid);
    assert_eq!(
        outcome.error.as_deref(),
        Some("proof is bound to a different job")
    );
    assert_eq!(mock.verify_calls(), 0);
}

#[tokio::test]
async fn test_fallback_proof_verifies_structurally_when_permissive() {
    let mock = MockService::spawn(ProverBehavior::ServerError, LedgerBehavior::ServerError).await;
    let files = ArtifactFiles::create();
    let engine = engine_for(&mock, &files, VerificationMode::Permissive);

    let proof = engine.generate(&request(90, "CA-ON", "mallory")).await.unwrap();
    assert!(!proof.is_cryptographic());

    let outcome = engine.verify(&submission(&proof)).await;
    assert_eq!(outcome.path, VerificationPath::Structural);
    assert!(outcome.eligible);
}
