//! Integration test: eligibility scenarios and engine-wide properties.
//!
//! Exercises zkhire-crypto and zkhire-proof together without any external
//! backend configured.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use zkhire_core::types::PUBLIC_SIGNAL_COUNT;
use zkhire_core::{ApplicantId, CircuitId, EngineConfig, JobId, Nullifier, PrivacyMetrics};
use zkhire_crypto::{leaf_hash, RegionMembershipTree};
use zkhire_integration_tests::{nullifier_for, sample_input, scenario_regions, test_key_hex, JOB_ID};
use zkhire_proof::adapters::OfflineProver;
use zkhire_proof::{
    EligibilityChecker, EligibilityEngine, GenerationRequest, PrivacyScorer, ProofOrchestrator,
};

fn offline_engine() -> EligibilityEngine {
    EligibilityEngine::from_config(&EngineConfig {
        nullifier_key: test_key_hex(),
        ..Default::default()
    })
    .expect("offline engine")
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_scenario_a_region_proof_index() {
    let regions = scenario_regions();
    assert_eq!(
        RegionMembershipTree::canonicalize(&regions),
        vec!["CA-ON", "US-CA", "US-NY"]
    );

    let proof = RegionMembershipTree::get_proof("US-NY", &regions);
    assert!(proof.valid);
    assert_eq!(proof.leaf_index, 2);

    let root = RegionMembershipTree::build(&regions);
    assert!(RegionMembershipTree::verify(&proof, &leaf_hash(b"US-NY"), &root));
}

#[test]
fn test_scenario_b_skill_too_low() {
    let mut input = sample_input(75, "US-CA", 100_000);
    input.public.allowed_regions.clear();
    input.public.region_merkle_root.clear();
    let report = EligibilityChecker::check(&input);
    assert!(!report.eligible);
    assert_eq!(report.reasons, vec!["rust proficiency too low: 75 < 80"]);
}

#[test]
fn test_scenario_c_all_constraints_met() {
    let mut input = sample_input(85, "US-CA", 100_000);
    input.public.allowed_regions = vec!["US-CA".into()];
    input.public.region_merkle_root = RegionMembershipTree::root_hex(&input.public.allowed_regions);
    let report = EligibilityChecker::check(&input);
    assert!(report.eligible);
    assert!(report.reasons.is_empty());
}

#[tokio::test]
async fn test_scenario_d_missing_artifacts_fall_back() {
    let orchestrator = ProofOrchestrator::new(Arc::new(OfflineProver), Duration::from_secs(1));
    let request = GenerationRequest {
        input: sample_input(85, "US-CA", 100_000),
        nullifier: nullifier_for("alice", JOB_ID),
        timestamp: None,
    };

    let proof = orchestrator
        .generate(&request)
        .await
        .expect("fallback path never fails on valid input");
    assert!(!proof.is_cryptographic());
    assert_eq!(proof.artifact().circuit_id, CircuitId::FallbackEligibilityV1);
    assert_eq!(
        proof.artifact().public_signals.to_vec().len(),
        PUBLIC_SIGNAL_COUNT
    );
    assert!(proof.artifact().proof.validate_shape().is_ok());
}

// =========================================================================
// Properties
// =========================================================================

#[test]
fn test_nullifier_idempotent_and_distinct() {
    let engine = offline_engine();
    let job = JobId::new(JOB_ID).unwrap();
    let alice = ApplicantId::new("alice").unwrap();
    let bob = ApplicantId::new("bob").unwrap();

    assert_eq!(
        engine.derive_nullifier(&alice, &job),
        engine.derive_nullifier(&alice, &job)
    );
    assert_ne!(
        engine.derive_nullifier(&alice, &job),
        engine.derive_nullifier(&bob, &job)
    );
    assert!(Nullifier::parse(engine.derive_nullifier(&alice, &job).as_str()).is_ok());
}

#[test]
fn test_distinct_keys_give_unlinkable_nullifiers() {
    let other = EligibilityEngine::from_config(&EngineConfig {
        nullifier_key: "c3".repeat(32),
        ..Default::default()
    })
    .unwrap();
    let job = JobId::new(JOB_ID).unwrap();
    let alice = ApplicantId::new("alice").unwrap();
    assert_ne!(
        offline_engine().derive_nullifier(&alice, &job),
        other.derive_nullifier(&alice, &job)
    );
}

#[test]
fn test_merkle_roundtrip_and_negative() {
    let regions: Vec<String> = ["DE-BE", "FR-IDF", "US-CA", "US-NY", "CA-ON", "GB-LND", "JP-13"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let root = RegionMembershipTree::build(&regions);

    for region in &regions {
        let proof = RegionMembershipTree::get_proof(region, &regions);
        assert!(
            RegionMembershipTree::verify(&proof, &leaf_hash(region.as_bytes()), &root),
            "{} should verify",
            region
        );
    }

    assert!(!RegionMembershipTree::get_proof("BR-SP", &regions).valid);
}

#[test]
fn test_eligibility_monotone_in_skill() {
    let mut flipped_at = None;
    for level in 0..=100u8 {
        let eligible = EligibilityChecker::check(&sample_input(level, "US-CA", 100_000)).eligible;
        match (flipped_at, eligible) {
            (None, true) => flipped_at = Some(level),
            (Some(_), false) => panic!("eligibility regressed at level {}", level),
            _ => {}
        }
    }
    assert_eq!(flipped_at, Some(80));
}

#[test]
fn test_score_bounds() {
    let values = [-1e9, -10.0, 0.0, 25.0, 50.0, 75.0, 100.0, 1e9];
    for &skills in &values {
        for &location in &values {
            for &salary in &values {
                for has_nullifier in [false, true] {
                    let score = PrivacyScorer::score(&PrivacyMetrics {
                        skills_revealed_pct: skills,
                        location_revealed_pct: location,
                        salary_revealed_pct: salary,
                        has_nullifier,
                    });
                    assert!(score <= 100);
                }
            }
        }
    }
}

#[tokio::test]
async fn test_uniform_contract_across_inputs() {
    let engine = offline_engine();
    let cases = [
        sample_input(85, "US-CA", 100_000),
        sample_input(10, "US-CA", 100_000),
        sample_input(85, "FR-IDF", 100_000),
        sample_input(85, "US-NY", 10),
    ];

    for (i, input) in cases.into_iter().enumerate() {
        let request = GenerationRequest {
            input,
            nullifier: nullifier_for(&format!("applicant-{}", i), JOB_ID),
            timestamp: Some(1_700_000_000 + i as i64),
        };
        let proof = engine.generate(&request).await.expect("generate");
        let wire = serde_json::to_value(proof.artifact()).unwrap();
        assert_eq!(wire["public_signals"].as_array().unwrap().len(), 4);
        assert!(wire["proof"]["pi_a"].is_array());
        assert!(wire["proof"]["pi_b"].is_array());
        assert!(wire["proof"]["pi_c"].is_array());
    }
}

#[tokio::test]
async fn test_missing_required_fields_fail_without_fallback() {
    let engine = offline_engine();
    let mut input = sample_input(85, "US-CA", 100_000);
    input.public.region_merkle_root.clear();
    let request = GenerationRequest {
        input,
        nullifier: nullifier_for("alice", JOB_ID),
        timestamp: None,
    };
    assert!(engine.generate(&request).await.is_err());
}

#[test]
fn test_missing_skill_treated_as_zero() {
    let mut input = sample_input(85, "US-CA", 100_000);
    input.private.skills = BTreeMap::new();
    let report = EligibilityChecker::check(&input);
    assert_eq!(report.reasons, vec!["rust proficiency too low: 0 < 80"]);
}
