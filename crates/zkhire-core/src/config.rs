use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CoreError;

/// How verification behaves when the ledger cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMode {
    /// Fail closed: no ledger, no valid verdict.
    #[default]
    Strict,
    /// Accept structurally well-formed proofs when the ledger is down.
    /// Not cryptographically sound; development use only.
    Permissive,
}

impl fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Permissive => write!(f, "permissive"),
        }
    }
}

impl FromStr for VerificationMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(CoreError::ValidationError(format!(
                "unknown verification mode: {}",
                other
            ))),
        }
    }
}

/// Proving backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverConfig {
    /// Base URL of the proving service. `None` disables real proving.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Compiled circuit (wasm) the prover needs.
    #[serde(default)]
    pub circuit_path: Option<PathBuf>,
    /// Groth16 proving key (zkey).
    #[serde(default)]
    pub proving_key_path: Option<PathBuf>,
    /// Upper bound on a proving call.
    #[serde(default = "default_prover_timeout_ms")]
    pub timeout_ms: u64,
}

/// Verification ledger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Base URL of the ledger service. `None` disables network verification.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Upper bound on a verification call.
    #[serde(default = "default_verifier_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub mode: VerificationMode,
}

/// Configuration for the eligibility-proof engine.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Hex-encoded 32-byte secret used to derive nullifiers.
    #[serde(default)]
    pub nullifier_key: String,
    #[serde(default)]
    pub prover: ProverConfig,
    #[serde(default)]
    pub verifier: VerifierConfig,
}

fn default_prover_timeout_ms() -> u64 {
    30_000
}
fn default_verifier_timeout_ms() -> u64 {
    10_000
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            circuit_path: None,
            proving_key_path: None,
            timeout_ms: default_prover_timeout_ms(),
        }
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: default_verifier_timeout_ms(),
            mode: VerificationMode::default(),
        }
    }
}

impl ProverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl VerifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("nullifier_key", &"<redacted>")
            .field("prover", &self.prover)
            .field("verifier", &self.verifier)
            .finish()
    }
}
