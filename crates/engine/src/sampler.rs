//! Confirmation sampling — a census of the largest balances plus a
//! random slice of the remaining population, monetary-unit-sampling
//! style coverage without scanning everything.
//!
//! Randomness is injected: callers pass any `Rng`, and tests pass a
//! seeded generator for reproducible draws.

use rand::seq::index;
use rand::Rng;

use auditgrid_core::{ConfirmationRequest, ConfirmationStatus, Customer, Invoice};

/// Top-balance invoices that are always confirmed.
pub const CENSUS_SIZE: usize = 3;

/// Select `sample_size` invoices for third-party confirmation: the
/// `CENSUS_SIZE` largest amounts (stable sort, ties keep insertion
/// order) plus a uniform draw without replacement from the remainder.
/// Sample sizes below the census still return the full census.
pub fn draw_confirmation_sample<R: Rng + ?Sized>(
    invoices: &[Invoice],
    customers: &[Customer],
    sample_size: usize,
    rng: &mut R,
) -> Vec<ConfirmationRequest> {
    let mut by_amount: Vec<&Invoice> = invoices.iter().collect();
    by_amount.sort_by(|a, b| b.amount.cmp(&a.amount));

    let census_len = CENSUS_SIZE.min(by_amount.len());
    let mut selected: Vec<&Invoice> = by_amount[..census_len].to_vec();

    let remainder = &by_amount[census_len..];
    let extra = sample_size.saturating_sub(census_len).min(remainder.len());
    if extra > 0 {
        let mut picked = index::sample(rng, remainder.len(), extra).into_vec();
        picked.sort_unstable();
        selected.extend(picked.into_iter().map(|i| remainder[i]));
    }

    selected
        .into_iter()
        .map(|inv| {
            let customer = customers.iter().find(|c| c.id == inv.customer_id);
            ConfirmationRequest {
                id: format!("CONF-{}", inv.id),
                invoice_id: inv.id.clone(),
                customer_name: customer
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Tidak Diketahui".into()),
                customer_email: customer
                    .map(|c| c.email.clone())
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "N/A".into()),
                recorded_amount: inv.amount,
                confirmed_amount: None,
                status: ConfirmationStatus::Sent,
                difference: 0,
            }
        })
        .collect()
}
