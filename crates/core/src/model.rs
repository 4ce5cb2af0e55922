use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub region: String,
    pub address: String,
    pub email: String,
    pub risk_profile: RiskProfile,
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[default]
    Open,
    Paid,
    Disputed,
}

/// A unified invoice record composed from the three evidence sources.
///
/// Amounts are whole currency units (the reporting currency carries no
/// minor unit); dates are date-only and timezone-naive. Invariant:
/// `due_date >= invoice_date`. Records are immutable within one
/// reconciliation run and superseded wholesale on re-ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    pub amount: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    /// Date the invoice hit the general ledger.
    pub recording_date: NaiveDate,
    /// Date of physical movement, from the warehouse shipping log.
    pub shipping_date: NaiveDate,
    pub status: InvoiceStatus,
    pub so_number: Option<String>,
    pub do_number: Option<String>,
    pub po_number: Option<String>,
    pub tax_invoice_number: Option<String>,
    pub description: Option<String>,
    pub currency: String,
}

impl Invoice {
    /// True when the warehouse leg of the three-way match failed.
    pub fn lacks_delivery_proof(&self) -> bool {
        self.do_number.as_deref().map_or(true, |d| d.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub account_code: String,
    pub account_name: String,
    pub balance: i64,
    pub as_of_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    TieIn,
    Cutoff,
    Confirmation,
    Aging,
    Analytical,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TieIn => write!(f, "tie_in"),
            Self::Cutoff => write!(f, "cutoff"),
            Self::Confirmation => write!(f, "confirmation"),
            Self::Aging => write!(f, "aging"),
            Self::Analytical => write!(f, "analytical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub id: String,
    pub kind: FindingKind,
    pub severity: Severity,
    pub description: String,
    /// Signed monetary impact of the exception.
    pub amount_difference: i64,
}

// ---------------------------------------------------------------------------
// Aging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingBucket {
    pub label: String,
    /// Inclusive lower bound in days; `None` = unbounded below.
    pub min_days: Option<i64>,
    /// Inclusive upper bound in days; `None` = unbounded above.
    pub max_days: Option<i64>,
    pub amount: i64,
    /// Allowance percentage applied to the bucket balance.
    pub allowance_rate: f64,
    pub allowance_amount: i64,
}

impl AgingBucket {
    pub fn contains(&self, age_days: i64) -> bool {
        self.min_days.map_or(true, |min| age_days >= min)
            && self.max_days.map_or(true, |max| age_days <= max)
    }

    pub fn net_realizable(&self) -> i64 {
        self.amount - self.allowance_amount
    }
}

// ---------------------------------------------------------------------------
// Reconciliation schedule
// ---------------------------------------------------------------------------

/// One line of the reconciling schedule rendered under the ledger balance.
/// The sign encodes direction: negative amounts reduce the ledger-side
/// total, positive amounts raise it toward the subledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationItem {
    pub description: String,
    pub amount: i64,
    pub finding_ref: String,
    pub risk_tag: Option<String>,
}

// ---------------------------------------------------------------------------
// Confirmations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationStatus {
    #[default]
    Sent,
    Received,
    Exception,
    NonResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub id: String,
    pub invoice_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub recorded_amount: i64,
    pub confirmed_amount: Option<i64>,
    pub status: ConfirmationStatus,
    /// Signed confirmed-minus-recorded gap, zero until a response lands.
    pub difference: i64,
}

impl ConfirmationRequest {
    /// Record a customer response. An exact confirmation closes the
    /// request; any difference flags it as an exception for follow-up.
    pub fn record_response(&mut self, confirmed: i64) {
        self.confirmed_amount = Some(confirmed);
        self.difference = confirmed - self.recorded_amount;
        self.status = if self.difference == 0 {
            ConfirmationStatus::Received
        } else {
            ConfirmationStatus::Exception
        };
    }
}
