//! Shared fixtures for the ZkHire integration tests: sample inputs, temporary
//! circuit artifacts, and a mock proving/ledger service over real HTTP.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use zkhire_core::{
    ApplicantId, EligibilityInput, JobId, Nullifier, PrivateInputs, PublicInputs,
};
use zkhire_crypto::hashing;
use zkhire_crypto::merkle::EMPTY_ROOT;
use zkhire_crypto::{MerkleProof, NullifierDeriver, NullifierKey, RegionMembershipTree};

// =========================================================================
// Inputs
// =========================================================================

pub const JOB_ID: &str = "job-rust-backend-42";

pub fn scenario_regions() -> Vec<String> {
    vec!["US-CA".into(), "US-NY".into(), "CA-ON".into()]
}

/// Input for a job needing rust >= 80, salary in [90k, 150k], and one of the
/// scenario regions.
pub fn sample_input(rust: u8, region: &str, expected_salary: u64) -> EligibilityInput {
    let regions = scenario_regions();
    EligibilityInput {
        private: PrivateInputs {
            skills: BTreeMap::from([("rust".to_string(), rust)]),
            region: region.into(),
            expected_salary,
        },
        public: PublicInputs {
            job_id: JOB_ID.into(),
            skill_thresholds: BTreeMap::from([("rust".to_string(), 80)]),
            salary_min: 90_000,
            salary_max: 150_000,
            region_merkle_root: RegionMembershipTree::root_hex(&regions),
            allowed_regions: regions,
        },
    }
}

pub fn test_key_hex() -> String {
    "3c".repeat(32)
}

pub fn test_deriver() -> NullifierDeriver {
    NullifierDeriver::new(NullifierKey::from_hex(&test_key_hex()).expect("test key"))
}

pub fn nullifier_for(applicant: &str, job: &str) -> Nullifier {
    test_deriver().derive(
        &ApplicantId::new(applicant).expect("applicant id"),
        &JobId::new(job).expect("job id"),
    )
}

// =========================================================================
// Circuit artifacts
// =========================================================================

static ARTIFACT_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Placeholder circuit and proving-key files, removed on drop.
pub struct ArtifactFiles {
    pub dir: PathBuf,
    pub circuit: PathBuf,
    pub proving_key: PathBuf,
}

impl ArtifactFiles {
    pub fn create() -> Self {
        let seq = ARTIFACT_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "zkhire-it-{}-{}",
            std::process::id(),
            seq
        ));
        std::fs::create_dir_all(&dir).expect("create artifact dir");
        let circuit = dir.join("eligibility.wasm");
        let proving_key = dir.join("eligibility_final.zkey");
        std::fs::write(&circuit, b"circuit").expect("write circuit");
        std::fs::write(&proving_key, b"zkey").expect("write proving key");
        Self {
            dir,
            circuit,
            proving_key,
        }
    }
}

impl Drop for ArtifactFiles {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

// =========================================================================
// Mock proving / ledger service
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProverBehavior {
    /// Evaluates the witness and echoes the public values.
    Honest,
    /// Drops the timestamp signal.
    ShortSignals,
    ServerError,
    /// 200 with a body that is not a proof.
    Garbage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBehavior {
    Accept,
    Reject,
    ServerError,
    /// 200 with a body missing `verified`.
    Garbage,
}

pub struct MockState {
    prover: ProverBehavior,
    ledger: LedgerBehavior,
    prove_calls: AtomicUsize,
    verify_calls: AtomicUsize,
}

#[derive(Deserialize)]
struct ProveBody {
    #[allow(dead_code)]
    circuit_path: String,
    #[allow(dead_code)]
    proving_key_path: String,
    input: Witness,
}

#[derive(Deserialize)]
struct Witness {
    private: PrivateWitness,
    public: PublicWitness,
}

#[derive(Deserialize)]
struct PrivateWitness {
    skills: BTreeMap<String, u8>,
    expected_salary: u64,
    region_leaf: String,
    region_path: Vec<String>,
    region_index: usize,
}

#[derive(Deserialize)]
struct PublicWitness {
    job_id_hash: String,
    skill_thresholds: BTreeMap<String, u8>,
    salary_min: u64,
    salary_max: u64,
    region_merkle_root: String,
    nullifier: String,
    timestamp: i64,
}

/// The constraints a real eligibility circuit enforces.
fn circuit_eligible(w: &Witness) -> bool {
    let skills_ok = w
        .public
        .skill_thresholds
        .iter()
        .all(|(skill, t)| w.private.skills.get(skill).copied().unwrap_or(0) >= *t);
    let salary_ok =
        (w.public.salary_min..=w.public.salary_max).contains(&w.private.expected_salary);
    skills_ok && salary_ok && region_ok(w)
}

fn region_ok(w: &Witness) -> bool {
    let Ok(root) = hashing::from_hex(&w.public.region_merkle_root) else {
        return false;
    };
    if root == EMPTY_ROOT {
        return true;
    }
    let Ok(leaf) = hashing::from_hex(&w.private.region_leaf) else {
        return false;
    };
    let Ok(sibling_hashes) = w
        .private
        .region_path
        .iter()
        .map(|s| hashing::from_hex(s))
        .collect::<Result<Vec<_>, _>>()
    else {
        return false;
    };
    let proof = MerkleProof {
        sibling_hashes,
        leaf_index: w.private.region_index,
        root,
        valid: true,
    };
    RegionMembershipTree::verify(&proof, &leaf, &root)
}

async fn handle_prove(
    State(state): State<Arc<MockState>>,
    Json(body): Json<ProveBody>,
) -> Result<Json<Value>, StatusCode> {
    state.prove_calls.fetch_add(1, Ordering::SeqCst);

    let witness = &body.input;
    let flag = if circuit_eligible(witness) { "1" } else { "0" };
    let mut signals = vec![
        witness.public.job_id_hash.clone(),
        witness.public.nullifier.clone(),
        flag.to_string(),
        witness.public.timestamp.to_string(),
    ];

    match state.prover {
        ProverBehavior::ServerError => return Err(StatusCode::INTERNAL_SERVER_ERROR),
        ProverBehavior::Garbage => return Ok(Json(json!({ "unexpected": true }))),
        ProverBehavior::ShortSignals => signals.truncate(3),
        ProverBehavior::Honest => {}
    }

    Ok(Json(json!({
        "proof": {
            "pi_a": ["101", "102", "1"],
            "pi_b": [["103", "104"], ["105", "106"], ["1", "0"]],
            "pi_c": ["107", "108", "1"],
            "protocol": "groth16",
            "curve": "bn128"
        },
        "publicSignals": signals
    })))
}

async fn handle_verify(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let n = state.verify_calls.fetch_add(1, Ordering::SeqCst);
    tracing::debug!(signals = %body["publicSignals"], "mock ledger submission");

    match state.ledger {
        LedgerBehavior::Accept => Ok(Json(json!({
            "verified": true,
            "transactionHash": format!("0x{:064x}", n + 1)
        }))),
        LedgerBehavior::Reject => Ok(Json(json!({ "verified": false }))),
        LedgerBehavior::ServerError => Err(StatusCode::SERVICE_UNAVAILABLE),
        LedgerBehavior::Garbage => Ok(Json(json!({ "status": "pending" }))),
    }
}

/// Mock service bound to an ephemeral localhost port. Stops on drop.
pub struct MockService {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockService {
    pub async fn spawn(prover: ProverBehavior, ledger: LedgerBehavior) -> Self {
        let state = Arc::new(MockState {
            prover,
            ledger,
            prove_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
        });
        let app = Router::new()
            .route("/prove", post(handle_prove))
            .route("/verify", post(handle_verify))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock service");
        let addr = listener.local_addr().expect("mock service address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn prove_calls(&self) -> usize {
        self.state.prove_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.state.verify_calls.load(Ordering::SeqCst)
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
