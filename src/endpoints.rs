//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/autos/{auto_id}', use [format_endpoint].

/// The route to list and create autos.
pub const AUTOS: &str = "/api/autos";
/// The route to access a single auto.
pub const AUTO: &str = "/api/autos/{auto_id}";
/// The route to list and create drivers.
pub const DRIVERS: &str = "/api/drivers";
/// The route to access a single driver.
pub const DRIVER: &str = "/api/drivers/{driver_id}";
/// The route to list and create rentals.
pub const RENTALS: &str = "/api/rentals";
/// The route to access a single rental.
pub const RENTAL: &str = "/api/rentals/{rental_id}";
/// The route to list and create payments.
pub const PAYMENTS: &str = "/api/payments";
/// The route to access a single payment.
pub const PAYMENT: &str = "/api/payments/{payment_id}";
/// The route for the paid, pending and overdue amounts of a rental.
pub const PAYMENT_SUMMARY: &str = "/api/payments/summary/{rental_id}";
/// The route to list and create maintenance records.
pub const MAINTENANCE: &str = "/api/maintenance";
/// The route to access a single maintenance record.
pub const MAINTENANCE_RECORD: &str = "/api/maintenance/{maintenance_id}";
/// The route for the total maintenance cost of each auto.
pub const MAINTENANCE_COST_PER_AUTO: &str = "/api/maintenance/cost/auto";
/// The route for the total maintenance cost of each month.
pub const MAINTENANCE_COST_PER_MONTH: &str = "/api/maintenance/cost/month";
/// The route for the dashboard summary.
pub const DASHBOARD: &str = "/api/analytics/dashboard";
/// The route for the trailing income and expense chart.
pub const CHART: &str = "/api/analytics/chart";
/// The route for the monthly report of a year.
pub const REPORTS: &str = "/api/analytics/reports";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Assumes the parameter is the last path segment wrapped in braces, e.g.
/// `/api/rentals/{rental_id}`. If there is no parameter, `endpoint_path` is
/// returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    match endpoint_path.rfind('{') {
        Some(param_start) if endpoint_path.ends_with('}') => {
            format!("{}{}", &endpoint_path[..param_start], id)
        }
        _ => endpoint_path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{AUTOS, PAYMENT_SUMMARY, format_endpoint};

    #[test]
    fn replaces_trailing_parameter() {
        assert_eq!(
            format_endpoint(PAYMENT_SUMMARY, "R-7"),
            "/api/payments/summary/R-7"
        );
    }

    #[test]
    fn leaves_paths_without_parameters_alone() {
        assert_eq!(format_endpoint(AUTOS, 1), AUTOS);
    }
}
