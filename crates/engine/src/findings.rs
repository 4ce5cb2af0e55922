//! Findings accumulation.
//!
//! Each engine run emits a typed batch of findings; the embedding layer
//! merges it into the persistent set by replacing the previous batch of
//! the same kind. Re-running cutoff testing therefore never disturbs
//! tie-in or confirmation findings, and vice versa.

use log::debug;

use auditgrid_core::{AuditFinding, FindingKind, Severity};

/// Drop every existing finding of `kind` and append `fresh`, preserving
/// the order of the untouched findings.
pub fn replace_by_kind(
    existing: &[AuditFinding],
    kind: FindingKind,
    fresh: Vec<AuditFinding>,
) -> Vec<AuditFinding> {
    let dropped = existing.iter().filter(|f| f.kind == kind).count();
    let mut merged: Vec<AuditFinding> = existing
        .iter()
        .filter(|f| f.kind != kind)
        .cloned()
        .collect();
    debug!(
        "findings: replaced {dropped} {kind} finding(s) with {}",
        fresh.len()
    );
    merged.extend(fresh);
    merged
}

/// (low, medium, high) counts across a finding set.
pub fn count_by_severity(findings: &[AuditFinding]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for f in findings {
        match f.severity {
            Severity::Low => counts.0 += 1,
            Severity::Medium => counts.1 += 1,
            Severity::High => counts.2 += 1,
        }
    }
    counts
}
