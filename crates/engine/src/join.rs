//! Three-way join — composes Finance, Warehouse, and Sales evidence rows
//! into unified invoice records.
//!
//! Finance is the driving source; Warehouse and Sales are corroborating
//! sources resolved by loose invoice-reference equality, first match
//! wins. A missing Warehouse or Sales source degrades join quality but
//! never fails the run; only a missing Finance source is fatal.

use std::collections::HashSet;

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use auditgrid_core::parse::{parse_amount, parse_date, ParseFailure};
use auditgrid_core::{
    AuditError, Customer, FieldValue, Invoice, InvoiceStatus, RiskProfile, SourceRow,
};

// Well-known column headers per source.
pub const FIN_INVOICE_ID: &str = "Invoice ID";
pub const FIN_CUSTOMER_ID: &str = "Customer ID";
pub const FIN_CUSTOMER_NAME: &str = "Customer Name";
pub const FIN_AMOUNT: &str = "Amount";
pub const FIN_INVOICE_DATE: &str = "Invoice Date";
pub const FIN_DUE_DATE: &str = "Due Date";
pub const FIN_RECORDING_DATE: &str = "Recording Date";

pub const WH_INVOICE_REF: &str = "Invoice Reference";
pub const WH_DELIVERY_ORDER: &str = "Delivery Order No";
pub const WH_SHIPPING_DATE: &str = "Shipping Date";

pub const SALES_INVOICE_REF: &str = "Invoice Reference";
pub const SALES_ORDER_NO: &str = "Sales Order No";
pub const SALES_PO_NUMBER: &str = "PO Number";
pub const SALES_TAX_INVOICE: &str = "Tax Invoice No";
pub const SALES_DESCRIPTION: &str = "Item Description";

/// Pre-loaded evidence rows grouped by source role.
#[derive(Debug, Clone)]
pub struct JoinInput {
    pub finance: Vec<SourceRow>,
    pub warehouse: Option<Vec<SourceRow>>,
    pub sales: Option<Vec<SourceRow>>,
    /// Fiscal year used when an invoice date cannot be recovered.
    pub fiscal_year: i32,
}

/// Local-recovery counters. Recoveries are never fatal but must stay
/// observable so callers can warn the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub generated_ids: usize,
    pub unparsable_amounts: usize,
    pub unparsable_dates: usize,
    /// Rows with no warehouse match. Their shipping date defaults to the
    /// invoice date — a policy choice, not a neutral unknown.
    pub missing_shipping_evidence: usize,
    pub due_date_clamped: usize,
}

impl DataQuality {
    pub fn has_warnings(&self) -> bool {
        self.generated_ids
            + self.unparsable_amounts
            + self.unparsable_dates
            + self.missing_shipping_evidence
            + self.due_date_clamped
            > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinOutput {
    pub invoices: Vec<Invoice>,
    pub customers: Vec<Customer>,
    /// Percentage of invoices carrying a delivery-order reference.
    /// Forced to zero when no Warehouse source was supplied: the
    /// denominator is the population but the numerator needs a match.
    pub doc_match_rate: f64,
    pub quality: DataQuality,
}

/// Parse a date field, falling back and counting the recovery. Blank
/// fields take the fallback silently; only garbage counts as a warning.
fn date_or(field: &FieldValue, fallback: NaiveDate, quality: &mut DataQuality) -> NaiveDate {
    match parse_date(field) {
        Ok(d) => d,
        Err(ParseFailure::Empty) => fallback,
        Err(_) => {
            quality.unparsable_dates += 1;
            fallback
        }
    }
}

pub fn three_way_join(input: &JoinInput) -> Result<JoinOutput, AuditError> {
    if input.finance.is_empty() {
        return Err(AuditError::MissingSource {
            role: "finance".into(),
        });
    }

    let fallback_invoice_date = NaiveDate::from_ymd_opt(input.fiscal_year, 1, 1).ok_or_else(|| {
        AuditError::ConfigValidation(format!("invalid fiscal year {}", input.fiscal_year))
    })?;

    let mut quality = DataQuality::default();
    let mut invoices = Vec::with_capacity(input.finance.len());
    let mut customers: Vec<Customer> = Vec::new();
    let mut seen_customers: HashSet<String> = HashSet::new();

    for (seq, row) in input.finance.iter().enumerate() {
        let id = match row.text(FIN_INVOICE_ID) {
            Some(id) => id,
            None => {
                quality.generated_ids += 1;
                format!("INV-GEN-{:04}", seq + 1)
            }
        };

        // First match wins; references compare string-coerced.
        let wh_row = input
            .warehouse
            .as_deref()
            .and_then(|rows| rows.iter().find(|r| r.get(WH_INVOICE_REF).as_text() == id));
        let sales_row = input
            .sales
            .as_deref()
            .and_then(|rows| rows.iter().find(|r| r.get(SALES_INVOICE_REF).as_text() == id));

        // Unparseable amounts behave as zero-value rather than excluded.
        let amount = match parse_amount(row.get(FIN_AMOUNT)) {
            Ok(v) => v,
            Err(ParseFailure::Empty) => 0,
            Err(_) => {
                quality.unparsable_amounts += 1;
                0
            }
        };

        let invoice_date = date_or(row.get(FIN_INVOICE_DATE), fallback_invoice_date, &mut quality);
        let mut due_date = date_or(row.get(FIN_DUE_DATE), invoice_date, &mut quality);
        let recording_date = date_or(row.get(FIN_RECORDING_DATE), invoice_date, &mut quality);

        if due_date < invoice_date {
            quality.due_date_clamped += 1;
            due_date = invoice_date;
        }

        let (do_number, shipping_date) = match wh_row {
            Some(wh) => (
                wh.text(WH_DELIVERY_ORDER),
                date_or(wh.get(WH_SHIPPING_DATE), invoice_date, &mut quality),
            ),
            None => {
                quality.missing_shipping_evidence += 1;
                (None, invoice_date)
            }
        };

        let customer_id = row
            .text(FIN_CUSTOMER_ID)
            .unwrap_or_else(|| "C-Unknown".to_string());
        if seen_customers.insert(customer_id.clone()) {
            customers.push(Customer {
                id: customer_id.clone(),
                name: row
                    .text(FIN_CUSTOMER_NAME)
                    .unwrap_or_else(|| format!("Pelanggan {customer_id}")),
                region: String::new(),
                address: String::new(),
                email: String::new(),
                risk_profile: RiskProfile::Medium,
            });
        }

        invoices.push(Invoice {
            id,
            customer_id,
            amount,
            invoice_date,
            due_date,
            recording_date,
            shipping_date,
            status: InvoiceStatus::Open,
            so_number: sales_row.and_then(|s| s.text(SALES_ORDER_NO)),
            do_number,
            po_number: sales_row.and_then(|s| s.text(SALES_PO_NUMBER)),
            tax_invoice_number: sales_row.and_then(|s| s.text(SALES_TAX_INVOICE)),
            description: sales_row.and_then(|s| s.text(SALES_DESCRIPTION)),
            currency: "IDR".into(),
        });
    }

    let doc_match_rate = match input.warehouse.as_deref() {
        Some(rows) if !rows.is_empty() => {
            let with_do = invoices.iter().filter(|i| !i.lacks_delivery_proof()).count();
            with_do as f64 * 100.0 / invoices.len() as f64
        }
        _ => 0.0,
    };

    debug!(
        "three-way join: {} invoice(s), {} customer(s), document match rate {:.1}%",
        invoices.len(),
        customers.len(),
        doc_match_rate
    );

    Ok(JoinOutput {
        invoices,
        customers,
        doc_match_rate,
        quality,
    })
}
