//! The dashboard summary: fleet size, rental counts and this month's profit.

use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    rental::RentalStatus,
    report::{
        totals::{MonthTotals, fetch_month_totals},
        window::MonthWindow,
    },
    store::{CountQuery, FleetStore},
};

/// The headline numbers shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    total_autos: u64,
    total_drivers: u64,
    active_rentals: u64,
    completed_rentals: u64,
    monthly_income: Decimal,
    monthly_expense: Decimal,
    profit: Decimal,
}

impl DashboardStats {
    fn new(
        total_autos: u64,
        total_drivers: u64,
        active_rentals: u64,
        completed_rentals: u64,
        totals: MonthTotals,
    ) -> Self {
        Self {
            total_autos,
            total_drivers,
            active_rentals,
            completed_rentals,
            monthly_income: totals.income,
            monthly_expense: totals.expense,
            profit: totals.profit(),
        }
    }
}

/// Builds the dashboard summary for the calendar month containing `today`.
///
/// The four counts and the month's payments and maintenance costs are read
/// concurrently.
///
/// # Errors
/// Returns [Error::StoreUnavailable] if any read fails.
pub async fn dashboard_stats<S: FleetStore>(
    store: &S,
    today: Date,
) -> Result<DashboardStats, Error> {
    let window = MonthWindow::containing(today)?;

    let (total_autos, total_drivers, active_rentals, completed_rentals, totals) = tokio::try_join!(
        store.count(CountQuery::Autos),
        store.count(CountQuery::Drivers),
        store.count(CountQuery::Rentals(RentalStatus::Active)),
        store.count(CountQuery::Rentals(RentalStatus::Completed)),
        fetch_month_totals(store, window),
    )?;

    Ok(DashboardStats::new(
        total_autos,
        total_drivers,
        active_rentals,
        completed_rentals,
        totals,
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        maintenance::MaintenanceRecord,
        payment::test_payment,
        rental::{RentalStatus, test_rental},
        report::test_store::MemoryStore,
    };

    use super::dashboard_stats;

    fn maintenance(date: time::Date, cost: rust_decimal::Decimal) -> MaintenanceRecord {
        MaintenanceRecord {
            id: 1,
            auto_id: "A-1".to_owned(),
            date,
            description: "Brake pads".to_owned(),
            cost,
        }
    }

    #[tokio::test]
    async fn counts_and_current_month_totals() {
        let mut completed = test_rental("R-2", dec!(100), None);
        completed.status = RentalStatus::Completed;
        let store = MemoryStore {
            autos: 3,
            drivers: 2,
            rentals: vec![test_rental("R-1", dec!(100), None), completed],
            payments: vec![
                test_payment("P-1", "R-1", date!(2024 - 05 - 01), dec!(300)),
                test_payment("P-2", "R-1", date!(2024 - 05 - 31), dec!(200.25)),
                test_payment("P-3", "R-1", date!(2024 - 04 - 30), dec!(999)),
            ],
            maintenance: vec![
                maintenance(date!(2024 - 05 - 10), dec!(120.25)),
                maintenance(date!(2024 - 06 - 01), dec!(999)),
            ],
            ..Default::default()
        };

        let stats = dashboard_stats(&store, date!(2024 - 05 - 15)).await.unwrap();

        assert_eq!(stats.total_autos, 3);
        assert_eq!(stats.total_drivers, 2);
        assert_eq!(stats.active_rentals, 1);
        assert_eq!(stats.completed_rentals, 1);
        assert_eq!(stats.monthly_income, dec!(500.25));
        assert_eq!(stats.monthly_expense, dec!(120.25));
        assert_eq!(stats.profit, dec!(380));
        assert_eq!(stats.profit, stats.monthly_income - stats.monthly_expense);
    }

    #[tokio::test]
    async fn profit_can_be_negative() {
        let store = MemoryStore {
            maintenance: vec![maintenance(date!(2024 - 05 - 10), dec!(50))],
            ..Default::default()
        };

        let stats = dashboard_stats(&store, date!(2024 - 05 - 15)).await.unwrap();

        assert_eq!(stats.monthly_income, dec!(0));
        assert_eq!(stats.profit, dec!(-50));
    }

    #[tokio::test]
    async fn empty_store_gives_zeroes() {
        let stats = dashboard_stats(&MemoryStore::default(), date!(2024 - 05 - 15))
            .await
            .unwrap();

        assert_eq!(stats.total_autos, 0);
        assert_eq!(stats.monthly_income, dec!(0));
        assert_eq!(stats.monthly_expense, dec!(0));
        assert_eq!(stats.profit, dec!(0));
    }

    #[tokio::test]
    async fn failed_read_fails_dashboard() {
        let store = MemoryStore {
            failing_month: Some(date!(2024 - 05 - 01)),
            ..Default::default()
        };

        let got = dashboard_stats(&store, date!(2024 - 05 - 15)).await;

        assert!(matches!(got, Err(Error::StoreUnavailable(_))));
    }
}
