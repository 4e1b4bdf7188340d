//! Income versus expense over the trailing months, for the dashboard chart.

use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    report::{
        totals::{MonthTotals, fetch_totals_for_windows},
        window::{MonthWindow, trailing_windows},
    },
    store::FleetStore,
};

/// How many months the chart covers when the caller does not say.
pub const DEFAULT_CHART_MONTHS: u32 = 6;

/// One month on the income versus expense chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// The three-letter month name, e.g. "Jan".
    month: &'static str,
    year: i32,
    income: Decimal,
    expense: Decimal,
}

impl ChartPoint {
    fn new(window: &MonthWindow, totals: MonthTotals) -> Self {
        Self {
            month: window.short_label(),
            year: window.year(),
            income: totals.income,
            expense: totals.expense,
        }
    }
}

/// Builds one [ChartPoint] per month for the `months` months ending with the
/// month containing `today`, oldest first.
///
/// Months with no payments or maintenance still get a point with zero totals.
///
/// # Errors
/// Returns [Error::InvalidPeriod] if `months` is out of range, or
/// [Error::StoreUnavailable] if the read for any month fails.
pub async fn income_expense_chart<S: FleetStore>(
    store: &S,
    months: u32,
    today: Date,
) -> Result<Vec<ChartPoint>, Error> {
    let windows = trailing_windows(months, today)?;
    let totals = fetch_totals_for_windows(store, &windows).await?;

    Ok(windows
        .iter()
        .zip(totals)
        .map(|(window, totals)| ChartPoint::new(window, totals))
        .collect())
}
