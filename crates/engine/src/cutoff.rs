//! Cutoff testing — flags invoices whose ledger recording date and
//! physical movement date straddle the period boundary.
//!
//! Only invoices near the boundary are evaluated; this bounds the check
//! to period-boundary risk, not a full-population fraud scan.

use chrono::NaiveDate;
use log::debug;

use auditgrid_core::dates::within_window;
use auditgrid_core::{AuditFinding, FindingKind, Invoice, Severity};

/// Scan the population for period-boundary mismatches around
/// `reporting_date`. Deterministic over the snapshot; re-running on the
/// same input yields the same findings, so callers replace the previous
/// Cutoff batch instead of appending.
pub fn perform_cutoff_test(
    invoices: &[Invoice],
    reporting_date: NaiveDate,
    window_days: i64,
) -> Vec<AuditFinding> {
    let mut findings = Vec::new();

    for inv in invoices {
        let near_boundary = within_window(inv.recording_date, reporting_date, window_days)
            || within_window(inv.shipping_date, reporting_date, window_days);
        if !near_boundary {
            continue;
        }

        let do_ref = inv.do_number.as_deref().unwrap_or("N/A");

        // Premature takes precedence; an invoice cannot be both.
        if inv.recording_date <= reporting_date && inv.shipping_date > reporting_date {
            findings.push(AuditFinding {
                id: format!("CUTOFF-PREM-{}", inv.id),
                kind: FindingKind::Cutoff,
                severity: Severity::High,
                description: format!(
                    "Premature recognition: invoice {} recorded {} but delivery order {} \
                     shows shipment on {}, after the period end",
                    inv.id, inv.recording_date, do_ref, inv.shipping_date
                ),
                amount_difference: inv.amount,
            });
        } else if inv.shipping_date <= reporting_date && inv.recording_date > reporting_date {
            findings.push(AuditFinding {
                id: format!("CUTOFF-UNREC-{}", inv.id),
                kind: FindingKind::Cutoff,
                severity: Severity::High,
                description: format!(
                    "Unrecorded revenue: goods under delivery order {} shipped {} but \
                     invoice {} was only recorded on {}, after the period end",
                    do_ref, inv.shipping_date, inv.id, inv.recording_date
                ),
                amount_difference: inv.amount,
            });
        }
    }

    debug!(
        "cutoff test: {} exception(s) within {} day(s) of {}",
        findings.len(),
        window_days,
        reporting_date
    );

    findings
}
