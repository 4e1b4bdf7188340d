//! Maintenance spending grouped by auto and by calendar month.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    Error,
    maintenance::MaintenanceRecord,
    report::aggregation::sum_by_key,
    store::FleetStore,
};

/// The total maintenance cost of one auto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoMaintenanceCost {
    auto_id: String,
    total_cost: Decimal,
}

/// The total maintenance cost of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyMaintenanceCost {
    /// The month as "YYYY-MM".
    month: String,
    total_cost: Decimal,
}

/// Totals maintenance cost per auto, sorted by auto ID.
pub async fn maintenance_cost_per_auto<S: FleetStore>(
    store: &S,
) -> Result<Vec<AutoMaintenanceCost>, Error> {
    let records = store.list_maintenance(None).await?;

    Ok(cost_per_auto(&records))
}

/// Totals maintenance cost per calendar month, oldest first.
///
/// Months without maintenance are left out.
pub async fn maintenance_cost_per_month<S: FleetStore>(
    store: &S,
) -> Result<Vec<MonthlyMaintenanceCost>, Error> {
    let records = store.list_maintenance(None).await?;

    Ok(cost_per_month(&records))
}

fn cost_per_auto(records: &[MaintenanceRecord]) -> Vec<AutoMaintenanceCost> {
    sum_by_key(records, |record| record.auto_id.clone())
        .into_iter()
        .map(|(auto_id, total_cost)| AutoMaintenanceCost {
            auto_id,
            total_cost,
        })
        .collect()
}

fn cost_per_month(records: &[MaintenanceRecord]) -> Vec<MonthlyMaintenanceCost> {
    // (year, month number) sorts chronologically, unlike the formatted label.
    sum_by_key(records, |record| (record.date.year(), u8::from(record.date.month())))
        .into_iter()
        .map(|((year, month), total_cost)| MonthlyMaintenanceCost {
            month: format!("{year:04}-{month:02}"),
            total_cost,
        })
        .collect()
}
