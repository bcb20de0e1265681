use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use zkhire_core::{
    Groth16Proof, JobPublicParameters, ProofPayload, ProverConfig, VerificationRequest,
    VerifierConfig,
};

use crate::backend::{
    LedgerReceipt, ProvingBackend, ProvingRequest, ProvingResponse, VerificationBackend,
};
use crate::error::ProofError;

const GROTH16_PROTOCOL: &str = "groth16";
const BN254_CURVES: &[&str] = &["bn128", "bn254"];

fn join(endpoint: &str, path: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), path)
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

#[derive(Serialize)]
struct ProveBody<'a> {
    circuit_path: &'a Path,
    proving_key_path: &'a Path,
    input: &'a ProvingRequest,
}

/// snarkjs-style proof object.
#[derive(Deserialize)]
struct WireProof {
    pi_a: [String; 3],
    pi_b: [[String; 2]; 3],
    pi_c: [String; 3],
    #[serde(default)]
    protocol: Option<String>,
    #[serde(default)]
    curve: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProveReply {
    proof: WireProof,
    public_signals: Vec<String>,
}

/// Groth16 prover reached over HTTP.
///
/// `POST {endpoint}/prove` with the circuit and key locations plus the full
/// witness; the service answers `{proof, publicSignals}` with signals in the
/// same encoding the witness used.
pub struct HttpProvingBackend {
    client: reqwest::Client,
    endpoint: String,
    circuit_path: Option<PathBuf>,
    proving_key_path: Option<PathBuf>,
}

impl HttpProvingBackend {
    pub fn new(
        endpoint: impl Into<String>,
        circuit_path: Option<PathBuf>,
        proving_key_path: Option<PathBuf>,
        timeout: Duration,
    ) -> Result<Self, ProofError> {
        let client = build_client(timeout)
            .map_err(|e| ProofError::ProvingBackend(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            circuit_path,
            proving_key_path,
        })
    }

    /// `None` when no prover endpoint is configured.
    pub fn from_config(config: &ProverConfig) -> Result<Option<Self>, ProofError> {
        config
            .endpoint
            .as_ref()
            .map(|endpoint| {
                Self::new(
                    endpoint.clone(),
                    config.circuit_path.clone(),
                    config.proving_key_path.clone(),
                    config.timeout(),
                )
            })
            .transpose()
    }
}

#[async_trait]
impl ProvingBackend for HttpProvingBackend {
    fn backend_id(&self) -> &str {
        &self.endpoint
    }

    fn artifacts_available(&self) -> bool {
        let present = |p: &Option<PathBuf>| p.as_deref().is_some_and(Path::is_file);
        present(&self.circuit_path) && present(&self.proving_key_path)
    }

    async fn prove(&self, request: &ProvingRequest) -> Result<ProvingResponse, ProofError> {
        let (circuit_path, proving_key_path) =
            match (&self.circuit_path, &self.proving_key_path) {
                (Some(c), Some(k)) => (c.as_path(), k.as_path()),
                _ => {
                    return Err(ProofError::ProvingBackend(
                        "circuit artifacts not configured".into(),
                    ))
                }
            };

        let body = ProveBody {
            circuit_path,
            proving_key_path,
            input: request,
        };

        let resp = self
            .client
            .post(join(&self.endpoint, "prove"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProofError::ProvingBackend(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProofError::ProvingBackend(format!(
                "prover returned HTTP {}",
                status
            )));
        }

        let reply: ProveReply = resp
            .json()
            .await
            .map_err(|e| ProofError::Malformed(format!("prover response: {}", e)))?;

        if let Some(protocol) = reply.proof.protocol.as_deref() {
            if protocol != GROTH16_PROTOCOL {
                return Err(ProofError::Malformed(format!(
                    "unsupported protocol: {}",
                    protocol
                )));
            }
        }
        if let Some(curve) = reply.proof.curve.as_deref() {
            if !BN254_CURVES.contains(&curve) {
                return Err(ProofError::Malformed(format!("unsupported curve: {}", curve)));
            }
        }

        Ok(ProvingResponse {
            proof: ProofPayload::Groth16Bn254(Groth16Proof {
                pi_a: reply.proof.pi_a,
                pi_b: reply.proof.pi_b,
                pi_c: reply.proof.pi_c,
            }),
            public_signals: reply.public_signals,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyBody<'a> {
    proof: &'a serde_json::Value,
    public_signals: &'a [String],
    job: &'a JobPublicParameters,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyReply {
    verified: bool,
    #[serde(default)]
    transaction_hash: Option<String>,
}

/// Verification ledger reached over HTTP at `POST {endpoint}/verify`.
pub struct HttpLedgerBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLedgerBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ProofError> {
        let client = build_client(timeout)
            .map_err(|e| ProofError::VerificationBackend(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// `None` when no ledger endpoint is configured.
    pub fn from_config(config: &VerifierConfig) -> Result<Option<Self>, ProofError> {
        config
            .endpoint
            .as_ref()
            .map(|endpoint| Self::new(endpoint.clone(), config.timeout()))
            .transpose()
    }
}

#[async_trait]
impl VerificationBackend for HttpLedgerBackend {
    fn backend_id(&self) -> &str {
        &self.endpoint
    }

    async fn submit(&self, request: &VerificationRequest) -> Result<LedgerReceipt, ProofError> {
        let body = VerifyBody {
            proof: &request.proof,
            public_signals: &request.public_signals,
            job: &request.job,
        };

        let resp = self
            .client
            .post(join(&self.endpoint, "verify"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProofError::VerificationBackend(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProofError::VerificationBackend(format!(
                "ledger returned HTTP {}",
                status
            )));
        }

        let reply: VerifyReply = resp
            .json()
            .await
            .map_err(|e| ProofError::VerificationBackend(format!("ledger response: {}", e)))?;

        Ok(LedgerReceipt {
            verified: reply.verified,
            transaction_hash: reply.transaction_hash,
        })
    }
}
