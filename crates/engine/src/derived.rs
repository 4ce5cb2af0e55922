//! Derived dataset builders — export-ready rows layered on engine
//! results, for embedding layers that render or persist the lead
//! schedule without linking against the domain types.

use serde::Serialize;
use serde_json::json;

use auditgrid_core::{LedgerSummary, ReconciliationItem};

use crate::detective::adjusted_ledger;

#[derive(Debug, Clone, Serialize)]
pub struct DerivedDataset {
    pub schema: String,
    pub version: u32,
    pub rows: Vec<serde_json::Value>,
}

impl DerivedDataset {
    pub fn new(schema: &str) -> Self {
        Self {
            schema: schema.to_string(),
            version: 1,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the `lead_schedule.v1` dataset: the ledger balance, one row per
/// reconciling item, the adjusted balance, and the subledger total with
/// the residual between the two.
pub fn build_lead_schedule(
    ledger: &LedgerSummary,
    items: &[ReconciliationItem],
    subledger_total: i64,
) -> DerivedDataset {
    let mut dataset = DerivedDataset::new("lead_schedule");

    dataset.rows.push(json!({
        "line": "ledger_balance",
        "description": ledger.account_name,
        "account_code": ledger.account_code,
        "amount": ledger.balance,
    }));

    for item in items {
        dataset.rows.push(json!({
            "line": "adjustment",
            "description": item.description,
            "amount": item.amount,
            "finding_ref": item.finding_ref,
            "risk_tag": item.risk_tag,
        }));
    }

    let adjusted = adjusted_ledger(ledger.balance, items);
    dataset.rows.push(json!({
        "line": "adjusted_ledger",
        "amount": adjusted,
    }));
    dataset.rows.push(json!({
        "line": "subledger_total",
        "amount": subledger_total,
        "residual": adjusted - subledger_total,
    }));

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ledger(balance: i64) -> LedgerSummary {
        LedgerSummary {
            account_code: "1-1200".into(),
            account_name: "Piutang Usaha".into(),
            balance,
            as_of_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        }
    }

    #[test]
    fn schedule_nets_to_the_subledger() {
        let items = vec![ReconciliationItem {
            description: "Manual journal entry without support".into(),
            amount: -2_000_000,
            finding_ref: "REC-JE-MANUAL".into(),
            risk_tag: Some("High Risk".into()),
        }];
        let ds = build_lead_schedule(&ledger(52_000_000), &items, 50_000_000);

        assert_eq!(ds.schema, "lead_schedule");
        assert_eq!(ds.rows.len(), 4);
        assert_eq!(ds.rows[0]["amount"], 52_000_000);
        assert_eq!(ds.rows[1]["finding_ref"], "REC-JE-MANUAL");
        assert_eq!(ds.rows[2]["amount"], 50_000_000);
        assert_eq!(ds.rows[3]["residual"], 0);
    }

    #[test]
    fn clean_schedule_has_no_adjustment_rows() {
        let ds = build_lead_schedule(&ledger(50_000_000), &[], 50_000_000);
        assert_eq!(ds.rows.len(), 3);
        assert!(!ds.is_empty());
    }
}
