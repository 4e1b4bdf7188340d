//! Income and expense totals for month windows, read from a [FleetStore].

use futures::future::try_join_all;
use rust_decimal::Decimal;

use crate::{
    Error,
    report::{aggregation::sum_in_window, window::MonthWindow},
    store::{FleetStore, PaymentFilter},
};

/// Income and expense for one month window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct MonthTotals {
    /// Payments received.
    pub income: Decimal,
    /// Maintenance costs.
    pub expense: Decimal,
}

impl MonthTotals {
    /// Income minus expense. Negative for a loss.
    pub fn profit(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Reads the payments and maintenance records for `window` concurrently and sums them.
pub(super) async fn fetch_month_totals<S: FleetStore>(
    store: &S,
    window: MonthWindow,
) -> Result<MonthTotals, Error> {
    let (payments, maintenance) = tokio::try_join!(
        store.list_payments(PaymentFilter::DateRange(window.date_range())),
        store.list_maintenance(Some(window.date_range())),
    )?;

    Ok(MonthTotals {
        income: sum_in_window(&payments, &window),
        expense: sum_in_window(&maintenance, &window),
    })
}

/// Computes the totals of each window concurrently.
///
/// # Returns
/// One [MonthTotals] per window, in the same order as `windows`.
///
/// # Errors
/// Fails as a whole if the read for any window fails.
pub(super) async fn fetch_totals_for_windows<S: FleetStore>(
    store: &S,
    windows: &[MonthWindow],
) -> Result<Vec<MonthTotals>, Error> {
    try_join_all(
        windows
            .iter()
            .map(|window| fetch_month_totals(store, *window)),
    )
    .await
    .inspect_err(|error| tracing::error!("could not compute monthly totals: {error}"))
}
