//! In-memory registry of claimed nullifiers.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use zkhire_core::{JobId, Nullifier};

/// Record kept per claimed nullifier. The applicant id is never stored.
#[derive(Debug, Clone)]
pub struct ClaimRecord {
    pub job_id: JobId,
    pub claimed_at: DateTime<Utc>,
}

/// Tracks which nullifiers have been used.
///
/// Claims are atomic per nullifier: of two concurrent claims for the same
/// value exactly one succeeds.
#[derive(Debug, Default)]
pub struct NullifierRegistry {
    claims: DashMap<String, ClaimRecord>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a nullifier. Returns `None` if it was already claimed.
    ///
    /// The claim is released when the guard drops, unless it was committed.
    pub fn claim(&self, nullifier: &Nullifier, job_id: &JobId) -> Option<ClaimGuard<'_>> {
        match self.claims.entry(nullifier.as_str().to_string()) {
            Entry::Occupied(existing) => {
                tracing::debug!(
                    job_id = %existing.get().job_id,
                    claimed_at = %existing.get().claimed_at,
                    "nullifier already claimed"
                );
                None
            }
            Entry::Vacant(slot) => {
                slot.insert(ClaimRecord {
                    job_id: job_id.clone(),
                    claimed_at: Utc::now(),
                });
                Some(ClaimGuard {
                    registry: self,
                    nullifier: nullifier.clone(),
                    committed: false,
                })
            }
        }
    }

    fn release(&self, nullifier: &Nullifier) -> bool {
        self.claims.remove(nullifier.as_str()).is_some()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// A pending claim on a nullifier.
#[derive(Debug)]
pub struct ClaimGuard<'a> {
    registry: &'a NullifierRegistry,
    nullifier: Nullifier,
    committed: bool,
}

impl ClaimGuard<'_> {
    /// Keep the claim for good.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        if !self.committed && self.registry.release(&self.nullifier) {
            tracing::debug!("nullifier claim released");
        }
    }
}
