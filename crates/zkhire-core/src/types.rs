use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CoreError;

/// Highest proficiency level a skill can carry.
pub const MAX_SKILL_LEVEL: u8 = 100;

/// Byte length of a value that must fit in a BN254 scalar (248 bits).
pub const FIELD_BYTES: usize = 31;

/// Hex length of a 32-byte hash.
pub const HASH_HEX_LEN: usize = 64;

/// Prefix carried by every nullifier and hex field element.
pub const HEX_PREFIX: &str = "0x";

/// Number of public signals every proof artifact exposes.
pub const PUBLIC_SIGNAL_COUNT: usize = 4;

/// Positions inside the public signal vector.
pub const SIGNAL_JOB_ID_HASH: usize = 0;
pub const SIGNAL_NULLIFIER: usize = 1;
pub const SIGNAL_ELIGIBLE: usize = 2;
pub const SIGNAL_TIMESTAMP: usize = 3;

/// Whether `s` is a field-element string: decimal digits, or `0x`-prefixed hex
/// of at most 32 bytes.
pub fn is_field_element(s: &str) -> bool {
    if let Some(hex_part) = s.strip_prefix(HEX_PREFIX) {
        return !hex_part.is_empty()
            && hex_part.len() <= HASH_HEX_LEN
            && hex_part.chars().all(|c| c.is_ascii_hexdigit());
    }
    // 78 digits covers any 256-bit value
    !s.is_empty() && s.len() <= 78 && s.chars().all(|c| c.is_ascii_digit())
}

/// Whether `s` is a 64-character hex hash.
pub fn is_hash_hex(s: &str) -> bool {
    s.len() == HASH_HEX_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Ids must be non-blank with no surrounding whitespace; they are hashed as-is.
fn check_identifier(field: &str, id: &str) -> Result<(), CoreError> {
    if id.trim().is_empty() {
        return Err(CoreError::MissingField(field.into()));
    }
    if id.trim() != id {
        return Err(CoreError::ValidationError(format!(
            "{} has leading or trailing whitespace",
            field
        )));
    }
    Ok(())
}

/// Identifier of the applicant asking for a proof.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApplicantId(String);

impl ApplicantId {
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        check_identifier("applicant_id", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApplicantId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApplicantId> for String {
    fn from(id: ApplicantId) -> Self {
        id.0
    }
}

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        check_identifier("job_id", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Replay-prevention token bound to an (applicant, job) pair.
///
/// Format: `0x` followed by 62 lowercase hex characters. The 248-bit width
/// keeps the value a canonical BN254 scalar so it can travel as a public signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nullifier(String);

impl Nullifier {
    /// Encode raw nullifier bytes.
    pub fn from_bytes(bytes: &[u8; FIELD_BYTES]) -> Self {
        Self(format!("{}{}", HEX_PREFIX, hex::encode(bytes)))
    }

    /// Parse and validate a nullifier string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let body = s
            .strip_prefix(HEX_PREFIX)
            .ok_or_else(|| CoreError::InvalidNullifier(format!("missing 0x prefix: {}", s)))?;
        if body.len() != FIELD_BYTES * 2 {
            return Err(CoreError::InvalidNullifier(format!(
                "expected {} hex characters, got {}",
                FIELD_BYTES * 2,
                body.len()
            )));
        }
        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(CoreError::InvalidNullifier(
                "nullifier must be lowercase hex".into(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Nullifier {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Nullifier> for String {
    fn from(n: Nullifier) -> Self {
        n.0
    }
}

impl fmt::Display for Nullifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Values the applicant keeps private. Working memory only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateInputs {
    /// Skill name → proficiency level (0–100).
    #[serde(default)]
    pub skills: BTreeMap<String, u8>,
    /// The applicant's region code (e.g. "US-CA").
    #[serde(default)]
    pub region: String,
    /// Expected yearly salary.
    pub expected_salary: u64,
}

/// Requirements published by the job poster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    /// The job this application targets.
    #[serde(default)]
    pub job_id: String,
    /// Skill name → minimum proficiency.
    #[serde(default)]
    pub skill_thresholds: BTreeMap<String, u8>,
    /// Inclusive lower salary bound.
    pub salary_min: u64,
    /// Inclusive upper salary bound.
    pub salary_max: u64,
    /// Regions the job accepts. Empty means no region restriction.
    #[serde(default)]
    pub allowed_regions: Vec<String>,
    /// Hex Merkle root committing to `allowed_regions`.
    #[serde(default)]
    pub region_merkle_root: String,
}

impl PublicInputs {
    /// The typed job identifier.
    pub fn job_id(&self) -> Result<JobId, CoreError> {
        JobId::new(self.job_id.clone())
    }

    /// Whether the job restricts applicants by region.
    pub fn restricts_region(&self) -> bool {
        !self.allowed_regions.is_empty()
    }

    /// Whether the root is set to anything other than the empty-set root.
    pub fn commits_to_regions(&self) -> bool {
        !self.region_merkle_root.is_empty() && !self.region_merkle_root.chars().all(|c| c == '0')
    }
}

/// Everything needed to evaluate one application attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub private: PrivateInputs,
    pub public: PublicInputs,
}

impl EligibilityInput {
    /// Check that all required fields are present and well-formed.
    ///
    /// This says nothing about eligibility itself; an ineligible applicant
    /// still has a valid input.
    pub fn validate(&self) -> Result<(), CoreError> {
        let public = &self.public;

        public.job_id()?;

        for (name, level) in &self.private.skills {
            if name.trim().is_empty() {
                return Err(CoreError::ValidationError("empty skill name".into()));
            }
            if *level > MAX_SKILL_LEVEL {
                return Err(CoreError::ValidationError(format!(
                    "skill level for {} out of range: {}",
                    name, level
                )));
            }
        }

        for (name, threshold) in &public.skill_thresholds {
            if name.trim().is_empty() {
                return Err(CoreError::ValidationError(
                    "empty skill name in thresholds".into(),
                ));
            }
            if *threshold > MAX_SKILL_LEVEL {
                return Err(CoreError::ValidationError(format!(
                    "threshold for {} out of range: {}",
                    name, threshold
                )));
            }
        }

        if public.salary_min > public.salary_max {
            return Err(CoreError::ValidationError(format!(
                "salary range is inverted: {} > {}",
                public.salary_min, public.salary_max
            )));
        }

        if public.restricts_region() {
            if self.private.region.trim().is_empty() {
                return Err(CoreError::MissingField("region".into()));
            }
            if public.region_merkle_root.is_empty() {
                return Err(CoreError::MissingField("region_merkle_root".into()));
            }
        }

        if !public.region_merkle_root.is_empty() && !is_hash_hex(&public.region_merkle_root) {
            return Err(CoreError::ValidationError(format!(
                "region_merkle_root must be {} hex characters",
                HASH_HEX_LEN
            )));
        }

        // A root over a non-empty region set needs the set to check membership.
        if !public.restricts_region() && public.commits_to_regions() {
            return Err(CoreError::ValidationError(
                "region_merkle_root commits to regions but allowed_regions is empty".into(),
            ));
        }

        Ok(())
    }
}

/// The four public signals of an eligibility proof, in wire order:
/// `[job_id_hash, nullifier, eligible, timestamp]`.
///
/// Serializes as a JSON array of exactly four strings. Any other length fails
/// to deserialize, so a value of this type always honors the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PublicSignals {
    pub job_id_hash: String,
    pub nullifier: String,
    pub eligible: bool,
    pub timestamp: i64,
}

impl PublicSignals {
    /// The wire representation.
    pub fn to_vec(&self) -> Vec<String> {
        vec![
            self.job_id_hash.clone(),
            self.nullifier.clone(),
            if self.eligible { "1" } else { "0" }.to_string(),
            self.timestamp.to_string(),
        ]
    }
}

impl TryFrom<Vec<String>> for PublicSignals {
    type Error = CoreError;

    fn try_from(signals: Vec<String>) -> Result<Self, Self::Error> {
        if signals.len() != PUBLIC_SIGNAL_COUNT {
            return Err(CoreError::InvalidSignals(format!(
                "expected {} public signals, got {}",
                PUBLIC_SIGNAL_COUNT,
                signals.len()
            )));
        }

        let job_id_hash = &signals[SIGNAL_JOB_ID_HASH];
        if !is_field_element(job_id_hash) {
            return Err(CoreError::InvalidSignals(
                "job id hash is not a field element".into(),
            ));
        }

        let nullifier = &signals[SIGNAL_NULLIFIER];
        if !is_field_element(nullifier) {
            return Err(CoreError::InvalidSignals(
                "nullifier is not a field element".into(),
            ));
        }

        let eligible = match signals[SIGNAL_ELIGIBLE].as_str() {
            "1" => true,
            "0" => false,
            other => {
                return Err(CoreError::InvalidSignals(format!(
                    "eligibility flag must be \"0\" or \"1\", got {:?}",
                    other
                )))
            }
        };

        let timestamp = signals[SIGNAL_TIMESTAMP].parse::<i64>().map_err(|_| {
            CoreError::InvalidSignals(format!(
                "timestamp is not an integer: {:?}",
                signals[SIGNAL_TIMESTAMP]
            ))
        })?;

        Ok(Self {
            job_id_hash: job_id_hash.clone(),
            nullifier: nullifier.clone(),
            eligible,
            timestamp,
        })
    }
}

impl From<PublicSignals> for Vec<String> {
    fn from(signals: PublicSignals) -> Self {
        signals.to_vec()
    }
}

/// A Groth16 proof in the snarkjs projective layout.
///
/// `pi_a` and `pi_c` are G1 points `[x, y, "1"]`; `pi_b` is a G2 point
/// `[[x0, x1], [y0, y1], ["1", "0"]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    pub pi_a: [String; 3],
    pub pi_b: [[String; 2]; 3],
    pub pi_c: [String; 3],
}

impl Groth16Proof {
    /// Check that every coordinate is a field element and that the points
    /// are in affine-normalized projective form.
    pub fn validate_shape(&self) -> Result<(), CoreError> {
        check_g1("pi_a", &self.pi_a)?;
        check_g1("pi_c", &self.pi_c)?;

        for (i, pair) in self.pi_b.iter().enumerate() {
            for coord in pair {
                if !is_field_element(coord) {
                    return Err(CoreError::MalformedProof(format!(
                        "pi_b[{}] has a non field-element coordinate",
                        i
                    )));
                }
            }
        }
        if self.pi_b[2][0] != "1" || self.pi_b[2][1] != "0" {
            return Err(CoreError::MalformedProof(
                "pi_b is not normalized".into(),
            ));
        }
        Ok(())
    }
}

fn check_g1(name: &str, point: &[String; 3]) -> Result<(), CoreError> {
    if !point.iter().all(|c| is_field_element(c)) {
        return Err(CoreError::MalformedProof(format!(
            "{} has a non field-element coordinate",
            name
        )));
    }
    if point[2] != "1" {
        return Err(CoreError::MalformedProof(format!(
            "{} is not normalized",
            name
        )));
    }
    Ok(())
}

/// Proof payload keyed by proving scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum ProofPayload {
    /// Groth16 over the BN254 curve.
    Groth16Bn254(Groth16Proof),
}

impl ProofPayload {
    /// Scheme tag as it appears on the wire.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Groth16Bn254(_) => "groth16_bn254",
        }
    }

    pub fn validate_shape(&self) -> Result<(), CoreError> {
        match self {
            Self::Groth16Bn254(proof) => proof.validate_shape(),
        }
    }
}

/// Names the generation path that produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitId {
    #[serde(rename = "real-eligibility-v1")]
    RealEligibilityV1,
    #[serde(rename = "fallback-eligibility-v1")]
    FallbackEligibilityV1,
}

impl CircuitId {
    /// Whether the artifact came from a proving backend.
    pub fn is_real(&self) -> bool {
        matches!(self, Self::RealEligibilityV1)
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RealEligibilityV1 => write!(f, "real-eligibility-v1"),
            Self::FallbackEligibilityV1 => write!(f, "fallback-eligibility-v1"),
        }
    }
}

/// Proof bundle handed to the caller for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    pub proof: ProofPayload,
    pub public_signals: PublicSignals,
    /// Hex BLAKE3 digest over the proof and public signals.
    pub proof_hash: String,
    pub circuit_id: CircuitId,
}

/// Result of a generation call.
///
/// Both variants carry an identically-shaped artifact. Only `Real` is backed
/// by a cryptographic proof; callers must decide how to treat `Fallback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "artifact", rename_all = "snake_case")]
pub enum GeneratedProof {
    Real(ProofArtifact),
    Fallback(ProofArtifact),
}

impl GeneratedProof {
    pub fn artifact(&self) -> &ProofArtifact {
        match self {
            Self::Real(a) | Self::Fallback(a) => a,
        }
    }

    /// Whether the artifact is backed by a real proof.
    pub fn is_cryptographic(&self) -> bool {
        matches!(self, Self::Real(_))
    }
}

/// Public job parameters sent alongside a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPublicParameters {
    /// Checked locally against the proof's job-id hash.
    pub job_id: String,
    /// Not checked locally: the public signals carry no region commitment.
    /// Forwarded to the ledger as part of the submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_merkle_root: Option<String>,
}

/// A proof submitted for verification.
///
/// Kept loosely typed so that malformed submissions reach the verifier and
/// are rejected with a reason instead of failing at the parsing boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(default)]
    pub proof: serde_json::Value,
    #[serde(default)]
    pub public_signals: Vec<String>,
    pub job: JobPublicParameters,
}

impl VerificationRequest {
    /// Build a submission from a generated artifact.
    pub fn from_artifact(
        artifact: &ProofArtifact,
        job: JobPublicParameters,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            proof: serde_json::to_value(&artifact.proof)?,
            public_signals: artifact.public_signals.to_vec(),
            job,
        })
    }
}

/// Which verification path produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPath {
    /// Checked by the external ledger.
    Network,
    /// Shape-only check after the ledger was unavailable.
    Structural,
    /// Rejected before or by verification.
    Rejected,
}

/// Result of a verification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub valid: bool,
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub path: VerificationPath,
}

impl VerificationOutcome {
    pub fn network(eligible: bool, transaction_hash: Option<String>) -> Self {
        Self {
            valid: true,
            eligible,
            transaction_hash,
            error: None,
            path: VerificationPath::Network,
        }
    }

    pub fn structural(eligible: bool) -> Self {
        Self {
            valid: true,
            eligible,
            transaction_hash: None,
            error: None,
            path: VerificationPath::Structural,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            eligible: false,
            transaction_hash: None,
            error: Some(error.into()),
            path: VerificationPath::Rejected,
        }
    }
}

/// How much private information a flow disclosed, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivacyMetrics {
    pub skills_revealed_pct: f64,
    pub location_revealed_pct: f64,
    pub salary_revealed_pct: f64,
    pub has_nullifier: bool,
}
