//! HTTP API server for the ZkHire node.
//!
//! Provides REST endpoints for eligibility checks, nullifier derivation,
//! region commitments, proof generation and verification, and privacy scoring.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use zkhire_core::{
    ApplicantId, EligibilityInput, GeneratedProof, JobId, Nullifier, PrivacyMetrics,
    VerificationMode, VerificationOutcome, VerificationRequest,
};
use zkhire_crypto::{MerkleProof, RegionMembershipTree};
use zkhire_proof::{GenerationRequest, PrivacyScorer};

use crate::state::AppState;

/// Same body for every ineligible application, whatever failed.
const INELIGIBLE_MESSAGE: &str = "applicant does not meet the job requirements";

// --- Request / response types ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub verification_mode: VerificationMode,
    pub claimed_nullifiers: usize,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct DeriveNullifierRequest {
    pub applicant_id: String,
    pub job_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NullifierResponse {
    pub nullifier: Nullifier,
}

#[derive(Debug, Deserialize)]
pub struct RegionRootRequest {
    pub regions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegionRootResponse {
    pub root: String,
    pub leaf_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct RegionProofRequest {
    pub region: String,
    pub regions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateProofRequest {
    pub applicant_id: String,
    pub input: EligibilityInput,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct GenerateProofResponse {
    #[serde(flatten)]
    pub proof: GeneratedProof,
    pub privacy_score: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: u8,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn bad_request(e: impl std::fmt::Display) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, e.to_string())
}

// --- Handlers ---

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        verification_mode: state.engine.verification_mode(),
        claimed_nullifiers: state.registry.len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_check(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EligibilityInput>,
) -> Result<Json<CheckResponse>, ApiError> {
    input.validate().map_err(bad_request)?;
    let report = state.engine.check(&input);
    if !report.eligible {
        tracing::debug!(
            job_id = %input.public.job_id,
            reasons = ?report.reasons,
            "applicant ineligible"
        );
    }
    Ok(Json(CheckResponse {
        eligible: report.eligible,
        reasons: state.expose_reasons.then_some(report.reasons),
    }))
}

async fn handle_derive_nullifier(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeriveNullifierRequest>,
) -> Result<Json<NullifierResponse>, ApiError> {
    let applicant = ApplicantId::new(req.applicant_id).map_err(bad_request)?;
    let job = JobId::new(req.job_id).map_err(bad_request)?;
    Ok(Json(NullifierResponse {
        nullifier: state.engine.derive_nullifier(&applicant, &job),
    }))
}

async fn handle_region_root(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegionRootRequest>,
) -> Json<RegionRootResponse> {
    Json(RegionRootResponse {
        root: state.engine.region_root(&req.regions),
        leaf_count: RegionMembershipTree::canonicalize(&req.regions).len(),
    })
}

async fn handle_region_proof(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegionProofRequest>,
) -> Json<MerkleProof> {
    Json(state.engine.region_proof(&req.region, &req.regions))
}

async fn handle_generate_proof(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateProofRequest>,
) -> Result<Json<GenerateProofResponse>, ApiError> {
    let applicant = ApplicantId::new(req.applicant_id).map_err(bad_request)?;
    req.input.validate().map_err(bad_request)?;
    let job = req.input.public.job_id().map_err(bad_request)?;

    let nullifier = state.engine.derive_nullifier(&applicant, &job);
    // Released on every early return, and if this future is dropped mid-await.
    let Some(claim) = state.registry.claim(&nullifier, &job) else {
        tracing::info!(job_id = %job, "duplicate application rejected");
        return Err(api_error(
            StatusCode::CONFLICT,
            "an application for this job already exists",
        ));
    };

    let report = state.engine.check(&req.input);
    if !report.eligible {
        tracing::debug!(job_id = %job, reasons = ?report.reasons, "applicant ineligible");
        return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, INELIGIBLE_MESSAGE));
    }

    let generation = GenerationRequest {
        input: req.input,
        nullifier,
        timestamp: req.timestamp,
    };
    let proof = state.engine.generate(&generation).await.map_err(bad_request)?;
    claim.commit();

    let metrics = PrivacyScorer::metrics_for(&report, state.expose_reasons, true);
    let privacy_score = state.engine.score(&metrics);

    tracing::info!(
        job_id = %job,
        circuit_id = %proof.artifact().circuit_id,
        cryptographic = proof.is_cryptographic(),
        "proof issued"
    );

    Ok(Json(GenerateProofResponse {
        proof,
        privacy_score,
    }))
}

async fn handle_verify_proof(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerificationRequest>,
) -> Json<VerificationOutcome> {
    Json(state.engine.verify(&req).await)
}

async fn handle_privacy_score(
    State(state): State<Arc<AppState>>,
    Json(metrics): Json<PrivacyMetrics>,
) -> Json<ScoreResponse> {
    Json(ScoreResponse {
        score: state.engine.score(&metrics),
    })
}

// --- Server ---

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/eligibility/check", post(handle_check))
        .route("/api/v1/nullifiers/derive", post(handle_derive_nullifier))
        .route("/api/v1/regions/root", post(handle_region_root))
        .route("/api/v1/regions/proof", post(handle_region_proof))
        .route("/api/v1/proofs/generate", post(handle_generate_proof))
        .route("/api/v1/proofs/verify", post(handle_verify_proof))
        .route("/api/v1/privacy/score", post(handle_privacy_score))
        .with_state(state)
}

pub async fn start_api_server<F>(
    listen_addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
