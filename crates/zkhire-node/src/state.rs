//! Shared state handed to every API handler.

use std::time::Instant;

use zkhire_proof::{EligibilityEngine, ProofError};

use crate::config::NodeConfig;
use crate::registry::NullifierRegistry;

pub struct AppState {
    pub engine: EligibilityEngine,
    pub registry: NullifierRegistry,
    /// Whether ineligibility reasons are returned to callers.
    pub expose_reasons: bool,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: EligibilityEngine, expose_reasons: bool) -> Self {
        Self {
            engine,
            registry: NullifierRegistry::new(),
            expose_reasons,
            start_time: Instant::now(),
        }
    }

    pub fn from_config(config: &NodeConfig) -> Result<Self, ProofError> {
        let engine = EligibilityEngine::from_config(&config.engine)?;
        Ok(Self::new(engine, config.privacy.expose_reasons))
    }
}
