use std::fmt;

use crate::error::CoreError;

/// The states of a single proof-generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GenerationState {
    /// Inputs received, backend not yet consulted.
    Init,
    /// Proving artifacts are present; the real backend is being called.
    AttemptReal,
    /// Building a placeholder artifact from known public values.
    AttemptFallback,
    /// A real proof was produced. Final state.
    SuccessReal,
    /// A fallback artifact was produced. Final state.
    SuccessFallback,
    /// Inputs were malformed. Final state.
    Failed,
}

impl GenerationState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::SuccessReal | Self::SuccessFallback | Self::Failed
        )
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "INIT"),
            Self::AttemptReal => write!(f, "ATTEMPT_REAL"),
            Self::AttemptFallback => write!(f, "ATTEMPT_FALLBACK"),
            Self::SuccessReal => write!(f, "SUCCESS_REAL"),
            Self::SuccessFallback => write!(f, "SUCCESS_FALLBACK"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Events that drive a generation call forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationEvent {
    /// Circuit and proving key are available.
    ArtifactsAvailable,
    /// Circuit or proving key is missing.
    ArtifactsMissing,
    /// Required input fields were absent or malformed.
    InputRejected,
    /// The proving backend returned a usable proof.
    RealSucceeded,
    /// The proving backend failed, timed out, or answered garbage.
    RealFailed,
    /// The fallback artifact was assembled.
    FallbackBuilt,
}

/// Manages generation state transitions.
///
/// Valid transitions:
/// - Init → AttemptReal (ArtifactsAvailable)
/// - Init → AttemptFallback (ArtifactsMissing)
/// - Init → Failed (InputRejected)
/// - AttemptReal → SuccessReal (RealSucceeded)
/// - AttemptReal → AttemptFallback (RealFailed)
/// - AttemptFallback → SuccessFallback (FallbackBuilt)
pub struct GenerationStateMachine;

impl GenerationStateMachine {
    pub fn transition(
        current: GenerationState,
        event: GenerationEvent,
    ) -> Result<GenerationState, CoreError> {
        let new_state = match (current, event) {
            (GenerationState::Init, GenerationEvent::ArtifactsAvailable) => {
                GenerationState::AttemptReal
            }
            (GenerationState::Init, GenerationEvent::ArtifactsMissing) => {
                GenerationState::AttemptFallback
            }
            (GenerationState::Init, GenerationEvent::InputRejected) => GenerationState::Failed,

            (GenerationState::AttemptReal, GenerationEvent::RealSucceeded) => {
                GenerationState::SuccessReal
            }
            (GenerationState::AttemptReal, GenerationEvent::RealFailed) => {
                GenerationState::AttemptFallback
            }

            (GenerationState::AttemptFallback, GenerationEvent::FallbackBuilt) => {
                GenerationState::SuccessFallback
            }

            _ => {
                return Err(CoreError::InvalidStateTransition {
                    from: current.to_string(),
                    event: format!("{:?}", event),
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "proof generation transition"
        );

        Ok(new_state)
    }

    pub fn can_transition(current: GenerationState, event: GenerationEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}

/// The states of a single verification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VerificationState {
    Init,
    /// Submitted to the external ledger.
    AttemptNetwork,
    /// Ledger unavailable; checking shape only.
    AttemptStructural,
    /// Accepted. Final state.
    Verified,
    /// Rejected. Final state, never retried.
    Rejected,
}

impl VerificationState {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "INIT"),
            Self::AttemptNetwork => write!(f, "ATTEMPT_NETWORK"),
            Self::AttemptStructural => write!(f, "ATTEMPT_STRUCTURAL"),
            Self::Verified => write!(f, "VERIFIED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Events that drive a verification call forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationEvent {
    /// The submission passed the shape pre-check.
    Submitted,
    /// The submission is malformed.
    ShapeRejected,
    /// The ledger confirmed the proof.
    LedgerAccepted,
    /// The ledger definitively refused the proof.
    LedgerRejected,
    /// The ledger could not be reached or answered garbage.
    LedgerUnavailable,
    /// Structural verification accepted the proof.
    StructuralAccepted,
    /// Structural verification is not allowed in the current mode.
    StructuralDisallowed,
}

/// Manages verification state transitions.
///
/// Valid transitions:
/// - Init → AttemptNetwork (Submitted)
/// - Init → Rejected (ShapeRejected)
/// - AttemptNetwork → Verified (LedgerAccepted)
/// - AttemptNetwork → Rejected (LedgerRejected)
/// - AttemptNetwork → AttemptStructural (LedgerUnavailable)
/// - AttemptStructural → Verified (StructuralAccepted)
/// - AttemptStructural → Rejected (StructuralDisallowed)
pub struct VerificationStateMachine;

impl VerificationStateMachine {
    pub fn transition(
        current: VerificationState,
        event: VerificationEvent,
    ) -> Result<VerificationState, CoreError> {
        let new_state = match (current, event) {
            (VerificationState::Init, VerificationEvent::Submitted) => {
                VerificationState::AttemptNetwork
            }
            (VerificationState::Init, VerificationEvent::ShapeRejected) => {
                VerificationState::Rejected
            }

            (VerificationState::AttemptNetwork, VerificationEvent::LedgerAccepted) => {
                VerificationState::Verified
            }
            (VerificationState::AttemptNetwork, VerificationEvent::LedgerRejected) => {
                VerificationState::Rejected
            }
            (VerificationState::AttemptNetwork, VerificationEvent::LedgerUnavailable) => {
                VerificationState::AttemptStructural
            }

            (VerificationState::AttemptStructural, VerificationEvent::StructuralAccepted) => {
                VerificationState::Verified
            }
            (VerificationState::AttemptStructural, VerificationEvent::StructuralDisallowed) => {
                VerificationState::Rejected
            }

            _ => {
                return Err(CoreError::InvalidStateTransition {
                    from: current.to_string(),
                    event: format!("{:?}", event),
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "verification transition"
        );

        Ok(new_state)
    }

    pub fn can_transition(current: VerificationState, event: VerificationEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
