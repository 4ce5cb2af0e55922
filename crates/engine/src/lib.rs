//! `auditgrid-engine` — multi-source AR reconciliation and anomaly engine.
//!
//! Pure engine crate: receives pre-loaded evidence rows, returns unified
//! invoices, aging buckets, findings, reconciliation schedules, and
//! confirmation samples. No CLI, filesystem, or network dependencies;
//! callers own persistence and rendering.

pub mod aging;
pub mod config;
pub mod cutoff;
pub mod derived;
pub mod detective;
pub mod engine;
pub mod findings;
pub mod join;
pub mod sampler;
pub mod simulate;
pub mod source;

pub use auditgrid_core::AuditError;
pub use config::AuditConfig;
pub use detective::TieInResult;
pub use engine::{run, AuditRun};
pub use join::{JoinInput, JoinOutput};
