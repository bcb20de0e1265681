//! Pluggable proving and verification backends.

pub mod http;
pub mod offline;

pub use http::{HttpLedgerBackend, HttpProvingBackend};
pub use offline::{OfflineLedger, OfflineProver};
