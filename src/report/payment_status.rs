//! How much has been paid against a rental, and how much is still owed.

use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    payment::Payment,
    rental::Rental,
    report::aggregation::sum_all,
    store::{FleetStore, PaymentFilter},
};

/// The payment position of one rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentStatus {
    total_paid: Decimal,
    /// Rent still owed. Negative when the rental has been overpaid.
    pending: Decimal,
    /// The pending amount once the rental's end date is reached, otherwise zero.
    overdue: Decimal,
}

impl PaymentStatus {
    /// Derive the status of `rental` from `payments` as of `today`.
    ///
    /// A rental is overdue from its end date onwards, as the end date counts
    /// from the start of that day. A rental without an end date is never overdue.
    pub fn calculate(rental: &Rental, payments: &[Payment], today: Date) -> Self {
        let total_paid = sum_all(payments);
        let pending = rental.rent_amount - total_paid;
        let has_ended = rental.end_date.is_some_and(|end_date| today >= end_date);

        let overdue = if pending > Decimal::ZERO && has_ended {
            pending
        } else {
            Decimal::ZERO
        };

        Self {
            total_paid,
            pending,
            overdue,
        }
    }

    /// The sum of all payments made against the rental.
    pub fn total_paid(&self) -> Decimal {
        self.total_paid
    }

    /// Rent still owed, negative when overpaid.
    pub fn pending(&self) -> Decimal {
        self.pending
    }

    /// The part of `pending` that is overdue.
    pub fn overdue(&self) -> Decimal {
        self.overdue
    }
}

/// Looks up the rental and its payments concurrently and derives its status.
///
/// # Errors
/// Returns [Error::NotFound] if there is no rental with `rental_id`, or
/// [Error::StoreUnavailable] if either read fails.
pub async fn rental_payment_status<S: FleetStore>(
    store: &S,
    rental_id: &str,
    today: Date,
) -> Result<PaymentStatus, Error> {
    let (rental, payments) = tokio::try_join!(
        store.get_rental(rental_id),
        store.list_payments(PaymentFilter::Rental(rental_id.to_owned())),
    )?;

    Ok(PaymentStatus::calculate(&rental, &payments, today))
}
