use std::sync::Arc;
use std::time::Duration;

use zkhire_core::{
    JobId, ProofPayload, PublicSignals, VerificationEvent, VerificationMode, VerificationOutcome,
    VerificationRequest, VerificationState, VerificationStateMachine,
};
use zkhire_crypto::hashing;

use crate::backend::VerificationBackend;

/// Checks submitted proofs against the ledger, with an optional structural
/// fallback.
///
/// Submissions that break the proof shape, the four-signal contract or the
/// job binding are rejected before the ledger is contacted. A definitive
/// ledger rejection is final. Only an unreachable ledger can lead to the
/// structural path, and only in [`VerificationMode::Permissive`].
pub struct VerificationOrchestrator {
    ledger: Arc<dyn VerificationBackend>,
    timeout: Duration,
    mode: VerificationMode,
}

impl VerificationOrchestrator {
    pub fn new(ledger: Arc<dyn VerificationBackend>, timeout: Duration, mode: VerificationMode) -> Self {
        if mode == VerificationMode::Permissive {
            tracing::warn!(
                backend = ledger.backend_id(),
                "permissive verification enabled: proofs may be accepted on structure alone"
            );
        }
        Self {
            ledger,
            timeout,
            mode,
        }
    }

    pub fn mode(&self) -> VerificationMode {
        self.mode
    }

    pub async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome {
        let state = VerificationState::Init;

        let signals = match precheck(request) {
            Ok(s) => s,
            Err(reason) => {
                step(state, VerificationEvent::ShapeRejected);
                tracing::info!(reason = %reason, "submission rejected before ledger");
                return VerificationOutcome::rejected(reason);
            }
        };

        let state = step(state, VerificationEvent::Submitted);
        let submitted = tokio::time::timeout(self.timeout, self.ledger.submit(request)).await;

        let unavailable = match submitted {
            Ok(Ok(receipt)) if receipt.verified => {
                step(state, VerificationEvent::LedgerAccepted);
                tracing::info!(
                    backend = self.ledger.backend_id(),
                    tx = ?receipt.transaction_hash,
                    eligible = signals.eligible,
                    "proof verified by ledger"
                );
                return VerificationOutcome::network(signals.eligible, receipt.transaction_hash);
            }
            Ok(Ok(_)) => {
                step(state, VerificationEvent::LedgerRejected);
                tracing::info!(backend = self.ledger.backend_id(), "proof rejected by ledger");
                return VerificationOutcome::rejected("proof rejected by ledger");
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("ledger timed out after {} ms", self.timeout.as_millis()),
        };

        let state = step(state, VerificationEvent::LedgerUnavailable);
        match self.mode {
            VerificationMode::Strict => {
                step(state, VerificationEvent::StructuralDisallowed);
                tracing::warn!(error = %unavailable, "ledger unavailable, rejecting in strict mode");
                VerificationOutcome::rejected(format!(
                    "verification backend unavailable: {}",
                    unavailable
                ))
            }
            VerificationMode::Permissive => {
                step(state, VerificationEvent::StructuralAccepted);
                tracing::warn!(
                    error = %unavailable,
                    "ledger unavailable, accepting proof on structure only"
                );
                VerificationOutcome::structural(signals.eligible)
            }
        }
    }
}

fn step(state: VerificationState, event: VerificationEvent) -> VerificationState {
    VerificationStateMachine::transition(state, event).unwrap_or_else(|e| {
        tracing::error!(error = %e, "unexpected verification transition");
        VerificationState::Rejected
    })
}

/// Local checks every submission must pass before reaching the ledger.
fn precheck(request: &VerificationRequest) -> Result<PublicSignals, String> {
    let signals =
        PublicSignals::try_from(request.public_signals.clone()).map_err(|e| e.to_string())?;

    let proof: ProofPayload = serde_json::from_value(request.proof.clone())
        .map_err(|e| format!("proof payload missing or malformed: {}", e))?;
    proof.validate_shape().map_err(|e| e.to_string())?;

    let job_id = JobId::new(request.job.job_id.clone()).map_err(|e| e.to_string())?;
    if signals.job_id_hash != hashing::job_id_hash(job_id.as_str()) {
        return Err("proof is bound to a different job".into());
    }

    Ok(signals)
}
