//! Financial reports computed from fleet records.
//!
//! Every report is built from calendar-month windows: the records of each
//! window are read from a [FleetStore](crate::FleetStore) and summed with
//! exact decimal arithmetic. Reads for different windows run concurrently and
//! any failed read fails the whole report.

mod aggregation;
mod annual;
mod chart;
mod dashboard;
mod handlers;
mod maintenance_costs;
mod payment_status;
#[cfg(test)]
mod test_store;
mod totals;
mod window;

pub use annual::{ReportRow, annual_report};
pub use chart::{ChartPoint, DEFAULT_CHART_MONTHS, income_expense_chart};
pub use dashboard::{DashboardStats, dashboard_stats};
pub use handlers::{
    get_annual_report, get_dashboard_stats, get_income_expense_chart,
    get_maintenance_cost_per_auto, get_maintenance_cost_per_month, get_payment_summary,
};
pub use maintenance_costs::{
    AutoMaintenanceCost, MonthlyMaintenanceCost, maintenance_cost_per_auto,
    maintenance_cost_per_month,
};
pub use payment_status::{PaymentStatus, rental_payment_status};
pub use window::{
    MAX_REPORT_YEAR, MAX_TRAILING_MONTHS, MIN_REPORT_YEAR, MonthWindow, trailing_windows,
    year_windows,
};
