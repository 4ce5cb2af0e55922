//! Independent recomputation of the receivables aging schedule and the
//! allowance for doubtful accounts.

use chrono::NaiveDate;

use auditgrid_core::dates::days_between;
use auditgrid_core::{AgingBucket, Invoice};

/// Default per-bucket allowance rates, in percent, not-yet-due first.
pub const DEFAULT_ALLOWANCE_RATES: [f64; 5] = [0.5, 2.0, 5.0, 15.0, 50.0];

/// The five-bucket aging layout. Labels follow the product's reporting
/// language. The first bucket takes every age at or below zero and the
/// last is open-ended upward, so the partition is total over all ages.
pub fn default_buckets() -> Vec<AgingBucket> {
    let spans: [(&str, Option<i64>, Option<i64>); 5] = [
        ("Belum Jatuh Tempo", None, Some(0)),
        ("1-30 Hari", Some(1), Some(30)),
        ("31-60 Hari", Some(31), Some(60)),
        ("61-90 Hari", Some(61), Some(90)),
        ("> 90 Hari", Some(91), None),
    ];

    spans
        .iter()
        .zip(DEFAULT_ALLOWANCE_RATES)
        .map(|((label, min_days, max_days), rate)| AgingBucket {
            label: label.to_string(),
            min_days: *min_days,
            max_days: *max_days,
            amount: 0,
            allowance_rate: rate,
            allowance_amount: 0,
        })
        .collect()
}

/// Bucket the population by age at the reporting date and compute the
/// allowance per bucket. Pure fold over the invoice set: idempotent and
/// order-independent. `rates` overrides the default allowance
/// percentages bucket-by-bucket when present.
pub fn calculate_aging(
    invoices: &[Invoice],
    reporting_date: NaiveDate,
    rates: Option<&[f64; 5]>,
) -> Vec<AgingBucket> {
    let mut buckets = default_buckets();
    if let Some(rates) = rates {
        for (bucket, rate) in buckets.iter_mut().zip(rates) {
            bucket.allowance_rate = *rate;
        }
    }

    for inv in invoices {
        let age = days_between(inv.invoice_date, reporting_date);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(age)) {
            bucket.amount += inv.amount;
        }
    }

    for bucket in &mut buckets {
        bucket.allowance_amount = allowance_for(bucket.amount, bucket.allowance_rate);
    }

    buckets
}

fn allowance_for(amount: i64, rate: f64) -> i64 {
    (amount as f64 * rate / 100.0).round() as i64
}

/// Aggregate (gross, allowance, net realizable) across the schedule.
pub fn net_realizable(buckets: &[AgingBucket]) -> (i64, i64, i64) {
    let gross: i64 = buckets.iter().map(|b| b.amount).sum();
    let allowance: i64 = buckets.iter().map(|b| b.allowance_amount).sum();
    (gross, allowance, gross - allowance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditgrid_core::InvoiceStatus;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn invoice(id: &str, amount: i64, invoice_date: NaiveDate) -> Invoice {
        Invoice {
            id: id.into(),
            customer_id: "C-001".into(),
            amount,
            invoice_date,
            due_date: invoice_date + Duration::days(30),
            recording_date: invoice_date,
            shipping_date: invoice_date,
            status: InvoiceStatus::Open,
            so_number: None,
            do_number: None,
            po_number: None,
            tax_invoice_number: None,
            description: None,
            currency: "IDR".into(),
        }
    }

    #[test]
    fn boundary_ages_land_in_the_right_buckets() {
        let reporting = date("2023-12-31");
        let invoices = vec![
            invoice("a", 100, reporting - Duration::days(30)),
            invoice("b", 200, reporting - Duration::days(31)),
        ];
        let buckets = calculate_aging(&invoices, reporting, None);
        assert_eq!(buckets[1].label, "1-30 Hari");
        assert_eq!(buckets[1].amount, 100);
        assert_eq!(buckets[2].label, "31-60 Hari");
        assert_eq!(buckets[2].amount, 200);
    }

    #[test]
    fn partition_is_total() {
        let reporting = date("2023-12-31");
        // Ages: far future, today, every boundary, and far past.
        let invoices = vec![
            invoice("future", 10, reporting + Duration::days(400)),
            invoice("today", 20, reporting),
            invoice("d1", 30, reporting - Duration::days(1)),
            invoice("d60", 40, reporting - Duration::days(60)),
            invoice("d90", 50, reporting - Duration::days(90)),
            invoice("d91", 60, reporting - Duration::days(91)),
            invoice("ancient", 70, reporting - Duration::days(4000)),
        ];
        let buckets = calculate_aging(&invoices, reporting, None);
        let bucket_total: i64 = buckets.iter().map(|b| b.amount).sum();
        let invoice_total: i64 = invoices.iter().map(|i| i.amount).sum();
        assert_eq!(bucket_total, invoice_total);
        // Not-yet-due catches zero and negative ages.
        assert_eq!(buckets[0].amount, 10 + 20);
        assert_eq!(buckets[4].amount, 60 + 70);
    }

    #[test]
    fn allowance_follows_rates() {
        let reporting = date("2023-12-31");
        let invoices = vec![invoice("a", 1_000_000, reporting - Duration::days(100))];
        let buckets = calculate_aging(&invoices, reporting, None);
        assert_eq!(buckets[4].allowance_rate, 50.0);
        assert_eq!(buckets[4].allowance_amount, 500_000);
        assert_eq!(buckets[4].net_realizable(), 500_000);
    }

    #[test]
    fn rate_overrides_apply_per_bucket() {
        let reporting = date("2023-12-31");
        let invoices = vec![invoice("a", 1_000_000, reporting - Duration::days(10))];
        let rates = [1.0, 10.0, 20.0, 30.0, 80.0];
        let buckets = calculate_aging(&invoices, reporting, Some(&rates));
        assert_eq!(buckets[1].allowance_rate, 10.0);
        assert_eq!(buckets[1].allowance_amount, 100_000);
    }

    #[test]
    fn idempotent_and_order_independent() {
        let reporting = date("2023-12-31");
        let mut invoices = vec![
            invoice("a", 111, reporting - Duration::days(5)),
            invoice("b", 222, reporting - Duration::days(45)),
            invoice("c", 333, reporting - Duration::days(95)),
        ];
        let first = calculate_aging(&invoices, reporting, None);
        invoices.reverse();
        let second = calculate_aging(&invoices, reporting, None);
        assert_eq!(first, second);
    }

    #[test]
    fn aggregate_net_realizable() {
        let reporting = date("2023-12-31");
        let invoices = vec![
            invoice("a", 1_000_000, reporting - Duration::days(10)),
            invoice("b", 1_000_000, reporting - Duration::days(100)),
        ];
        let buckets = calculate_aging(&invoices, reporting, None);
        let (gross, allowance, net) = net_realizable(&buckets);
        assert_eq!(gross, 2_000_000);
        assert_eq!(allowance, 20_000 + 500_000);
        assert_eq!(net, gross - allowance);
    }
}
