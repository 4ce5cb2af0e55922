//! Synthetic dataset generator for demos and deterministic testing.
//!
//! Mirrors the production data profile: a base population of routine,
//! fully cross-referenced invoices; even odds of a premature/unrecorded
//! cutoff pair at year-end; and even odds of a sabotaged ledger balance
//! for the tie-in detective to explain. All randomness flows through the
//! injected `Rng`, so a fixed seed reproduces the dataset exactly.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use auditgrid_core::{
    AuditError, Customer, Invoice, InvoiceStatus, LedgerSummary, RiskProfile,
};

#[derive(Debug, Clone)]
pub struct SimulatedData {
    pub invoices: Vec<Invoice>,
    pub customers: Vec<Customer>,
    pub ledger: LedgerSummary,
}

const ITEMS: &[&str] = &[
    "Laptop Business Series",
    "Server Rack 42U",
    "Switch Catalyst 24 Port",
    "Kabel Fiber Optic 1000m",
    "Lisensi Software Enterprise",
    "Jasa Konsultasi Implementasi",
    "Sparepart Mesin Produksi",
];

fn base_customers() -> Vec<Customer> {
    let rows: [(&str, &str, &str, &str, &str, RiskProfile); 6] = [
        (
            "C-001",
            "PT Sinar Jaya Abadi",
            "Jawa Barat",
            "Jl. Industri No. 45, Bekasi",
            "finance@sinarjaya.co.id",
            RiskProfile::Low,
        ),
        (
            "C-002",
            "CV Maju Mundur",
            "Jawa Timur",
            "Kawasan Rungkut Industri Blok A",
            "accounting@majumundur.com",
            RiskProfile::Medium,
        ),
        (
            "C-003",
            "Toko Bangunan Sejahtera",
            "Sumatera",
            "Jl. Medan Merdeka, Medan",
            "owner@tokosejahtera.com",
            RiskProfile::High,
        ),
        (
            "C-004",
            "PT Teknindo Solusi",
            "Jakarta",
            "Gedung Cyber Lt 5, Jakarta Selatan",
            "ap@teknindo.com",
            RiskProfile::Low,
        ),
        (
            "C-005",
            "UD Bali Makmur",
            "Bali",
            "Jl. Sunset Road, Denpasar",
            "admin@balimakmur.net",
            RiskProfile::Medium,
        ),
        (
            "C-006",
            "PT Global Ekspor",
            "Banten",
            "Kawasan Pergudangan Bandara",
            "exim@globalekspor.id",
            RiskProfile::High,
        ),
    ];

    rows.iter()
        .map(|(id, name, region, address, email, risk)| Customer {
            id: (*id).into(),
            name: (*name).into(),
            region: (*region).into(),
            address: (*address).into(),
            email: (*email).into(),
            risk_profile: *risk,
        })
        .collect()
}

pub fn generate_dataset<R: Rng + ?Sized>(
    fiscal_year: i32,
    rng: &mut R,
) -> Result<SimulatedData, AuditError> {
    if !(1900..=2200).contains(&fiscal_year) {
        return Err(AuditError::ConfigValidation(format!(
            "fiscal year {fiscal_year} outside 1900-2200"
        )));
    }
    let year_end = NaiveDate::from_ymd_opt(fiscal_year, 12, 31).unwrap();
    let short_year = fiscal_year % 100;

    let customers = base_customers();
    let mut invoices = Vec::new();

    // Base population: 60-90 routine invoices over the last four months.
    let count = 60 + rng.gen_range(0..30);
    for i in 0..count {
        let days_back = rng.gen_range(0..120);
        let invoice_date = year_end - Duration::days(days_back);
        let customer = &customers[rng.gen_range(0..customers.len())];
        let amount = 2_500_000 + 1_000 * rng.gen_range(0..45_000i64);
        let suffix = 1000 + i;
        let po_seq = rng.gen_range(100..1000);
        let qty = rng.gen_range(1..=50);
        let item = ITEMS[rng.gen_range(0..ITEMS.len())];
        let customer_seq = customer.id.split('-').nth(1).unwrap_or("000");

        invoices.push(Invoice {
            id: format!("INV/{fiscal_year}/{suffix}"),
            customer_id: customer.id.clone(),
            amount,
            invoice_date,
            due_date: invoice_date + Duration::days(30),
            recording_date: invoice_date,
            shipping_date: invoice_date,
            status: InvoiceStatus::Open,
            so_number: Some(format!("SO-{fiscal_year}-{suffix}")),
            do_number: Some(format!("DO-{fiscal_year}-{suffix}")),
            po_number: Some(format!("PO-{customer_seq}-{po_seq}")),
            tax_invoice_number: Some(format!("010.000-{short_year:02}.{suffix}00")),
            description: Some(format!("{item} - Qty {qty}")),
            currency: "IDR".into(),
        });
    }

    // Even odds of a cutoff error pair at the boundary, else one clean
    // year-end invoice.
    if rng.gen_bool(0.5) {
        let next_year = fiscal_year + 1;
        invoices.push(Invoice {
            id: format!("INV/{fiscal_year}/9991"),
            customer_id: customers[0].id.clone(),
            amount: 85_500_000,
            invoice_date: NaiveDate::from_ymd_opt(fiscal_year, 12, 30).unwrap(),
            due_date: NaiveDate::from_ymd_opt(next_year, 1, 30).unwrap(),
            recording_date: NaiveDate::from_ymd_opt(fiscal_year, 12, 30).unwrap(),
            shipping_date: NaiveDate::from_ymd_opt(next_year, 1, 4).unwrap(),
            status: InvoiceStatus::Open,
            so_number: Some(format!("SO-{fiscal_year}-9991")),
            do_number: Some(format!("DO-{next_year}-0004")),
            po_number: Some("PO-EXT-001".into()),
            tax_invoice_number: Some(format!("010.000-{short_year:02}.9991")),
            description: Some("Pengiriman Akhir Tahun (Pending)".into()),
            currency: "IDR".into(),
        });
        invoices.push(Invoice {
            id: format!("INV/{fiscal_year}/9992"),
            customer_id: customers[1].id.clone(),
            amount: 62_000_000,
            invoice_date: NaiveDate::from_ymd_opt(fiscal_year, 12, 28).unwrap(),
            due_date: NaiveDate::from_ymd_opt(next_year, 1, 28).unwrap(),
            recording_date: NaiveDate::from_ymd_opt(next_year, 1, 3).unwrap(),
            shipping_date: NaiveDate::from_ymd_opt(fiscal_year, 12, 28).unwrap(),
            status: InvoiceStatus::Open,
            so_number: Some(format!("SO-{fiscal_year}-9992")),
            do_number: Some(format!("DO-{fiscal_year}-9992")),
            po_number: Some("PO-EXT-002".into()),
            tax_invoice_number: Some(format!("010.000-{short_year:02}.9992")),
            description: Some("Barang Terkirim Belum Tagih".into()),
            currency: "IDR".into(),
        });
    } else {
        invoices.push(Invoice {
            id: format!("INV/{fiscal_year}/9995"),
            customer_id: customers[0].id.clone(),
            amount: 90_000_000,
            invoice_date: NaiveDate::from_ymd_opt(fiscal_year, 12, 30).unwrap(),
            due_date: NaiveDate::from_ymd_opt(fiscal_year + 1, 1, 30).unwrap(),
            recording_date: NaiveDate::from_ymd_opt(fiscal_year, 12, 30).unwrap(),
            shipping_date: NaiveDate::from_ymd_opt(fiscal_year, 12, 30).unwrap(),
            status: InvoiceStatus::Open,
            so_number: Some(format!("SO-{fiscal_year}-9995")),
            do_number: Some(format!("DO-{fiscal_year}-9995")),
            po_number: Some("PO-CLEAN-01".into()),
            tax_invoice_number: Some(format!("010.000-{short_year:02}.9995")),
            description: Some("Penjualan Rutin Q4".into()),
            currency: "IDR".into(),
        });
    }

    // Even odds of a ledger sabotage: drop and/or double one invoice's
    // amount, falling back to a flat bump when the two cancel out.
    let true_total: i64 = invoices.iter().map(|i| i.amount).sum();
    let mut balance = true_total;
    if rng.gen_bool(0.5) {
        if rng.gen_bool(0.4) {
            balance -= invoices[rng.gen_range(0..invoices.len())].amount;
        }
        if rng.gen_bool(0.4) {
            balance += invoices[rng.gen_range(0..invoices.len())].amount;
        }
        if balance == true_total {
            balance += 10_000_000;
        }
    }

    Ok(SimulatedData {
        invoices,
        customers,
        ledger: LedgerSummary {
            account_code: "1-1200".into(),
            account_name: "Piutang Usaha - Pihak Ketiga".into(),
            balance,
            as_of_date: year_end,
        },
    })
}
