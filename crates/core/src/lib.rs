//! `auditgrid-core` — domain records and leaf utilities for the AuditGrid
//! reconciliation engine.
//!
//! Pure data crate: no IO, no randomness, no engine logic. Everything the
//! engine computes over lives here so embedding layers can depend on the
//! types without pulling in the engine itself.

pub mod dates;
pub mod error;
pub mod model;
pub mod parse;
pub mod value;

pub use error::AuditError;
pub use model::{
    AgingBucket, AuditFinding, ConfirmationRequest, ConfirmationStatus, Customer, FindingKind,
    Invoice, InvoiceStatus, LedgerSummary, ReconciliationItem, RiskProfile, Severity,
};
pub use value::{FieldValue, SourceRow};
