//! Variance decomposition — explains the gap between the ledger balance
//! and the subledger total as an ordered set of named causes.
//!
//! Single-pass greedy heuristic classifier: rules fire in a fixed
//! priority order and each cause is consumed at most once per run, so
//! ties and repeated causes of the same kind will not all be found.
//! Later rules see the variance as already reduced by earlier ones; the
//! sequencing is deliberate, not incidental.

use log::debug;
use serde::Serialize;

use auditgrid_core::{
    AuditFinding, FindingKind, Invoice, LedgerSummary, ReconciliationItem, Severity,
};

use crate::config::AuditConfig;

/// Outcome of one decomposition run. Only Tie-in findings are produced;
/// callers replace the previous Tie-in batch and leave every other
/// finding kind untouched.
#[derive(Debug, Clone, Serialize)]
pub struct TieInResult {
    pub subledger_total: i64,
    /// Initial ledger-minus-subledger gap.
    pub variance: i64,
    /// True when the gap was within materiality from the start.
    pub matched: bool,
    pub findings: Vec<AuditFinding>,
    pub items: Vec<ReconciliationItem>,
}

pub fn decompose_variance(
    ledger: &LedgerSummary,
    invoices: &[Invoice],
    config: &AuditConfig,
) -> TieInResult {
    let subledger_total: i64 = invoices.iter().map(|i| i.amount).sum();
    let initial_variance = ledger.balance - subledger_total;

    let mut findings = Vec::new();
    let mut items = Vec::new();

    if initial_variance.abs() <= config.materiality {
        debug!("tie-in: variance {initial_variance} within materiality, balances matched");
        return TieInResult {
            subledger_total,
            variance: initial_variance,
            matched: true,
            findings,
            items,
        };
    }

    let mut variance = initial_variance;

    if variance > 0 {
        // Ledger overstates the subledger. A round-figure gap points at an
        // unsupported top-side entry; an invoice-sized gap at double posting.
        if variance % config.round_journal_multiple == 0 {
            findings.push(AuditFinding {
                id: "REC-JE-MANUAL".into(),
                kind: FindingKind::TieIn,
                severity: Severity::High,
                description: format!(
                    "Unsupported top-side journal entry: the {variance} gap is an exact \
                     multiple of {} with no supporting invoice detail",
                    config.round_journal_multiple
                ),
                amount_difference: variance,
            });
            items.push(ReconciliationItem {
                description: "Manual journal entry without support".into(),
                amount: -variance,
                finding_ref: "REC-JE-MANUAL".into(),
                risk_tag: Some("High Risk".into()),
            });
            variance = 0;
        } else if let Some(suspect) = invoices
            .iter()
            .find(|inv| (inv.amount - variance).abs() < config.match_tolerance)
        {
            findings.push(AuditFinding {
                id: format!("REC-DBL-{}", suspect.id),
                kind: FindingKind::TieIn,
                severity: Severity::High,
                description: format!(
                    "Double recording: invoice {} for {} appears twice in the ledger \
                     but once in the subledger",
                    suspect.id, suspect.amount
                ),
                amount_difference: suspect.amount,
            });
            items.push(ReconciliationItem {
                description: format!("Reverse double recording of {}", suspect.id),
                amount: -suspect.amount,
                finding_ref: format!("REC-DBL-{}", suspect.id),
                risk_tag: Some("Error".into()),
            });
            variance -= suspect.amount;
        }
    } else {
        // Subledger overstates the ledger. Look first for an invoice the
        // warehouse never shipped (the ledger may be right to omit it),
        // then for a valid invoice the ledger has not posted yet.
        let mut remaining = variance.abs();

        for inv in invoices.iter().filter(|i| i.lacks_delivery_proof()) {
            if remaining > 0 && (remaining - inv.amount).abs() < config.match_tolerance {
                findings.push(AuditFinding {
                    id: format!("REC-INVALID-{}", inv.id),
                    kind: FindingKind::TieIn,
                    severity: Severity::Medium,
                    description: format!(
                        "Invoice without delivery proof: {} sits in the subledger with no \
                         delivery order; the ledger never recorded it",
                        inv.id
                    ),
                    amount_difference: inv.amount,
                });
                items.push(ReconciliationItem {
                    description: format!("Remove invoice {} lacking delivery proof", inv.id),
                    amount: -inv.amount,
                    finding_ref: format!("REC-INVALID-{}", inv.id),
                    risk_tag: Some("3-Way Fail".into()),
                });
                remaining -= inv.amount;
                // One deduction of this kind per run.
                break;
            }
        }

        if remaining > 0 {
            if let Some(suspect) = invoices
                .iter()
                .find(|inv| (inv.amount - remaining).abs() < config.match_tolerance)
            {
                findings.push(AuditFinding {
                    id: format!("REC-UNREC-{}", suspect.id),
                    kind: FindingKind::TieIn,
                    severity: Severity::High,
                    description: format!(
                        "Unposted invoice: {} is valid (delivery order on file) but \
                         missing from the ledger balance",
                        suspect.id
                    ),
                    amount_difference: suspect.amount,
                });
                items.push(ReconciliationItem {
                    description: format!("Post invoice {} to the ledger", suspect.id),
                    amount: suspect.amount,
                    finding_ref: format!("REC-UNREC-{}", suspect.id),
                    risk_tag: Some("Cutoff".into()),
                });
                remaining -= suspect.amount;
            }
        }

        variance = -remaining;
    }

    // Whatever stays unexplained is itself a finding, never dropped.
    if variance.abs() > config.materiality {
        findings.push(AuditFinding {
            id: "REC-UNKNOWN".into(),
            kind: FindingKind::TieIn,
            severity: Severity::High,
            description: format!(
                "Unexplained difference of {variance} remains after heuristic decomposition"
            ),
            amount_difference: variance,
        });
        items.push(ReconciliationItem {
            description: "Unexplained difference".into(),
            amount: -variance,
            finding_ref: "REC-UNKNOWN".into(),
            risk_tag: Some("Unknown".into()),
        });
    }

    debug!(
        "tie-in: variance {initial_variance} decomposed into {} finding(s), residual {variance}",
        findings.len()
    );

    TieInResult {
        subledger_total,
        variance: initial_variance,
        matched: false,
        findings,
        items,
    }
}

/// Ledger balance after applying the reconciling schedule.
pub fn adjusted_ledger(ledger_balance: i64, items: &[ReconciliationItem]) -> i64 {
    ledger_balance + items.iter().map(|i| i.amount).sum::<i64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditgrid_core::InvoiceStatus;
    use chrono::NaiveDate;

    fn invoice(id: &str, amount: i64, do_number: Option<&str>) -> Invoice {
        let d = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        Invoice {
            id: id.into(),
            customer_id: "C-001".into(),
            amount,
            invoice_date: d,
            due_date: d,
            recording_date: d,
            shipping_date: d,
            status: InvoiceStatus::Open,
            so_number: None,
            do_number: do_number.map(Into::into),
            po_number: None,
            tax_invoice_number: None,
            description: None,
            currency: "IDR".into(),
        }
    }

    fn ledger(balance: i64) -> LedgerSummary {
        LedgerSummary {
            account_code: "1-1200".into(),
            account_name: "Piutang Usaha".into(),
            balance,
            as_of_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        }
    }

    fn population() -> Vec<Invoice> {
        vec![
            invoice("INV-1", 12_000_000, Some("DO-1")),
            invoice("INV-2", 7_300_000, Some("DO-2")),
            invoice("INV-3", 500_000, None),
            invoice("INV-4", 3_141_593, Some("DO-4")),
        ]
    }

    fn total(invoices: &[Invoice]) -> i64 {
        invoices.iter().map(|i| i.amount).sum()
    }

    #[test]
    fn immaterial_variance_matches() {
        let invoices = population();
        let result = decompose_variance(&ledger(total(&invoices) + 999), &invoices, &AuditConfig::default());
        assert!(result.matched);
        assert!(result.findings.is_empty());
        assert!(result.items.is_empty());
    }

    #[test]
    fn round_gap_is_a_manual_journal_entry() {
        let invoices = population();
        let gl = ledger(total(&invoices) + 2_000_000);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());

        assert_eq!(result.findings.len(), 1);
        let f = &result.findings[0];
        assert_eq!(f.id, "REC-JE-MANUAL");
        assert_eq!(f.severity, Severity::High);
        assert_eq!(f.amount_difference, 2_000_000);

        // The item fully offsets the entry: adjusted ledger ties to the subledger.
        assert_eq!(adjusted_ledger(gl.balance, &result.items), result.subledger_total);
    }

    #[test]
    fn invoice_sized_gap_is_double_recording() {
        let invoices = population();
        // +3,141,593 is not a round million but matches INV-4 exactly.
        let gl = ledger(total(&invoices) + 3_141_593);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());

        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].id, "REC-DBL-INV-4");
        assert_eq!(result.findings[0].amount_difference, 3_141_593);
        assert_eq!(adjusted_ledger(gl.balance, &result.items), result.subledger_total);
    }

    #[test]
    fn near_match_within_tolerance_counts() {
        let invoices = population();
        let gl = ledger(total(&invoices) + 3_141_550);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].id, "REC-DBL-INV-4");
    }

    #[test]
    fn missing_delivery_proof_explains_subledger_excess() {
        let invoices = population();
        // Ledger is short exactly the no-DO invoice: the subledger carries
        // something the warehouse never shipped.
        let gl = ledger(total(&invoices) - 500_000);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());

        assert_eq!(result.findings.len(), 1);
        let f = &result.findings[0];
        assert_eq!(f.id, "REC-INVALID-INV-3");
        assert_eq!(f.severity, Severity::Medium);
        assert_eq!(f.amount_difference, 500_000);
        assert_eq!(result.items[0].amount, -500_000);
    }

    #[test]
    fn unposted_invoice_explains_subledger_excess() {
        let invoices = population();
        // Ledger is short a fully-documented invoice: unposted, not fictitious.
        let gl = ledger(total(&invoices) - 7_300_000);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());

        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].id, "REC-UNREC-INV-2");
        assert_eq!(result.findings[0].severity, Severity::High);
        // The item raises the ledger toward the subledger.
        assert_eq!(result.items[0].amount, 7_300_000);
        assert_eq!(adjusted_ledger(gl.balance, &result.items), result.subledger_total);
    }

    #[test]
    fn first_no_do_candidate_wins() {
        let invoices = vec![
            invoice("INV-A", 500_000, None),
            invoice("INV-B", 500_000, None),
            invoice("INV-C", 9_000_000, Some("DO-C")),
        ];
        let gl = ledger(total(&invoices) - 500_000);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].id, "REC-INVALID-INV-A");
    }

    #[test]
    fn unexplained_residual_is_reported_not_dropped() {
        let invoices = population();
        let gl = ledger(total(&invoices) + 777_777);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());

        assert_eq!(result.findings.len(), 1);
        let f = &result.findings[0];
        assert_eq!(f.id, "REC-UNKNOWN");
        assert_eq!(f.amount_difference, 777_777);
        assert_eq!(adjusted_ledger(gl.balance, &result.items), result.subledger_total);
    }

    #[test]
    fn fully_explained_gap_leaves_no_residual_finding() {
        // The fallback tests the remaining variance, so a gap consumed by
        // an earlier rule must not re-surface as unexplained.
        let invoices = population();
        let gl = ledger(total(&invoices) - 500_000);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());
        assert!(result
            .findings
            .iter()
            .all(|f| f.id != "REC-UNKNOWN"));
    }

    #[test]
    fn negative_residual_falls_through_to_unexplained() {
        let invoices = population();
        let gl = ledger(total(&invoices) - 123_456_789);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].id, "REC-UNKNOWN");
        assert_eq!(result.findings[0].amount_difference, -123_456_789);
        assert_eq!(adjusted_ledger(gl.balance, &result.items), result.subledger_total);
    }

    #[test]
    fn only_tie_in_findings_are_produced() {
        let invoices = population();
        let gl = ledger(total(&invoices) + 2_000_000);
        let result = decompose_variance(&gl, &invoices, &AuditConfig::default());
        assert!(result.findings.iter().all(|f| f.kind == FindingKind::TieIn));
    }
}
