//! The month by month profit and loss report for a calendar year.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    Error,
    report::{
        totals::{MonthTotals, fetch_totals_for_windows},
        window::{MonthWindow, year_windows},
    },
    store::FleetStore,
};

/// One month of the annual report.
///
/// `profit` always equals `income - expense`; rows can only be built from
/// month totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// The full month name, e.g. "January".
    month: String,
    income: Decimal,
    expense: Decimal,
    profit: Decimal,
}

impl ReportRow {
    fn new(window: &MonthWindow, totals: MonthTotals) -> Self {
        Self {
            month: window.full_label(),
            income: totals.income,
            expense: totals.expense,
            profit: totals.profit(),
        }
    }
}

/// Builds twelve rows, January through December of `year`.
///
/// # Errors
/// Returns [Error::InvalidPeriod] for an unsupported year, or
/// [Error::StoreUnavailable] if the read for any month fails.
pub async fn annual_report<S: FleetStore>(store: &S, year: i32) -> Result<Vec<ReportRow>, Error> {
    let windows = year_windows(year)?;
    let totals = fetch_totals_for_windows(store, &windows).await?;

    Ok(windows
        .iter()
        .zip(totals)
        .map(|(window, totals)| ReportRow::new(window, totals))
        .collect())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error, maintenance::MaintenanceRecord, payment::test_payment,
        report::test_store::MemoryStore,
    };

    use super::annual_report;

    fn maintenance(date: time::Date, cost: Decimal) -> MaintenanceRecord {
        MaintenanceRecord {
            id: 1,
            auto_id: "A-1".to_owned(),
            date,
            description: "Service".to_owned(),
            cost,
        }
    }

    #[tokio::test]
    async fn twelve_rows_in_calendar_order() {
        let store = MemoryStore {
            payments: vec![
                test_payment("P-1", "R-1", date!(2023 - 01 - 15), dec!(1000)),
                test_payment("P-2", "R-1", date!(2023 - 12 - 31), dec!(400)),
                test_payment("P-3", "R-1", date!(2024 - 01 - 01), dec!(999)),
            ],
            maintenance: vec![
                maintenance(date!(2023 - 01 - 20), dec!(200)),
                maintenance(date!(2023 - 06 - 01), dec!(75.5)),
            ],
            ..Default::default()
        };

        let rows = annual_report(&store, 2023).await.unwrap();

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].month, "January");
        assert_eq!(rows[0].income, dec!(1000));
        assert_eq!(rows[0].expense, dec!(200));
        assert_eq!(rows[0].profit, dec!(800));
        assert_eq!(rows[5].month, "June");
        assert_eq!(rows[5].profit, dec!(-75.5));
        assert_eq!(rows[11].month, "December");
        assert_eq!(rows[11].income, dec!(400));
        for row in &rows {
            assert_eq!(row.profit, row.income - row.expense);
        }
    }

    #[tokio::test]
    async fn rows_sum_to_year_totals() {
        let store = MemoryStore {
            payments: vec![
                test_payment("P-1", "R-1", date!(2022 - 02 - 28), dec!(10.10)),
                test_payment("P-2", "R-1", date!(2022 - 03 - 01), dec!(20.20)),
                test_payment("P-3", "R-1", date!(2022 - 11 - 30), dec!(30.30)),
            ],
            ..Default::default()
        };

        let rows = annual_report(&store, 2022).await.unwrap();

        let total: Decimal = rows.iter().map(|row| row.income).sum();
        assert_eq!(total, dec!(60.60));
    }

    #[tokio::test]
    async fn year_without_records_is_all_zero() {
        let rows = annual_report(&MemoryStore::default(), 2030).await.unwrap();

        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|row| row.profit.is_zero()));
    }

    #[tokio::test]
    async fn unsupported_year_is_invalid() {
        let got = annual_report(&MemoryStore::default(), 1800).await;

        assert!(matches!(got, Err(Error::InvalidPeriod(_))));
    }

    #[tokio::test]
    async fn one_failed_month_fails_the_report() {
        let store = MemoryStore {
            failing_month: Some(date!(2023 - 07 - 01)),
            ..Default::default()
        };

        let got = annual_report(&store, 2023).await;

        assert!(matches!(got, Err(Error::StoreUnavailable(_))));
    }
}
