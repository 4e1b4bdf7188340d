//! Application router configuration for the record and analytics routes.

use axum::{Router, routing::get};

use crate::{
    AppState,
    auto::{
        create_auto_endpoint, delete_auto_endpoint, get_auto_endpoint, list_autos_endpoint,
        update_auto_endpoint,
    },
    driver::{
        create_driver_endpoint, delete_driver_endpoint, get_driver_endpoint,
        list_drivers_endpoint, update_driver_endpoint,
    },
    endpoints,
    maintenance::{
        create_maintenance_endpoint, delete_maintenance_endpoint, get_maintenance_endpoint,
        list_maintenance_endpoint, update_maintenance_endpoint,
    },
    not_found::get_404_not_found,
    payment::{
        create_payment_endpoint, delete_payment_endpoint, get_payment_endpoint,
        list_payments_endpoint, update_payment_endpoint,
    },
    rental::{
        create_rental_endpoint, delete_rental_endpoint, get_rental_endpoint,
        list_rentals_endpoint, update_rental_endpoint,
    },
    report::{
        get_annual_report, get_dashboard_stats, get_income_expense_chart,
        get_maintenance_cost_per_auto, get_maintenance_cost_per_month, get_payment_summary,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let record_routes = Router::new()
        .route(
            endpoints::AUTOS,
            get(list_autos_endpoint).post(create_auto_endpoint),
        )
        .route(
            endpoints::AUTO,
            get(get_auto_endpoint)
                .put(update_auto_endpoint)
                .delete(delete_auto_endpoint),
        )
        .route(
            endpoints::DRIVERS,
            get(list_drivers_endpoint).post(create_driver_endpoint),
        )
        .route(
            endpoints::DRIVER,
            get(get_driver_endpoint)
                .put(update_driver_endpoint)
                .delete(delete_driver_endpoint),
        )
        .route(
            endpoints::RENTALS,
            get(list_rentals_endpoint).post(create_rental_endpoint),
        )
        .route(
            endpoints::RENTAL,
            get(get_rental_endpoint)
                .put(update_rental_endpoint)
                .delete(delete_rental_endpoint),
        )
        .route(
            endpoints::PAYMENTS,
            get(list_payments_endpoint).post(create_payment_endpoint),
        )
        .route(
            endpoints::PAYMENT,
            get(get_payment_endpoint)
                .put(update_payment_endpoint)
                .delete(delete_payment_endpoint),
        )
        .route(
            endpoints::MAINTENANCE,
            get(list_maintenance_endpoint).post(create_maintenance_endpoint),
        )
        .route(
            endpoints::MAINTENANCE_RECORD,
            get(get_maintenance_endpoint)
                .put(update_maintenance_endpoint)
                .delete(delete_maintenance_endpoint),
        );

    let report_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_stats))
        .route(endpoints::CHART, get(get_income_expense_chart))
        .route(endpoints::REPORTS, get(get_annual_report))
        .route(endpoints::PAYMENT_SUMMARY, get(get_payment_summary))
        .route(
            endpoints::MAINTENANCE_COST_PER_AUTO,
            get(get_maintenance_cost_per_auto),
        )
        .route(
            endpoints::MAINTENANCE_COST_PER_MONTH,
            get(get_maintenance_cost_per_month),
        );

    record_routes
        .merge(report_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
