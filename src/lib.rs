//! Fleet Ledger tracks a small fleet's autos, drivers, rentals, payments and
//! maintenance costs, and turns those records into financial reports.
//!
//! This library provides a JSON REST API. The record endpoints store and
//! retrieve fleet records, and the analytics endpoints serve the dashboard
//! summary, trailing income/expense chart, annual report and per-rental
//! payment status.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod auto;
mod database_id;
mod db;
mod driver;
mod endpoints;
mod logging;
mod maintenance;
mod not_found;
mod payment;
mod rental;
mod report;
mod routing;
mod store;
mod timezone;

pub use app_state::AppState;
pub use auto::{Auto, AutoStatus, FuelType, create_auto};
pub use db::{UnknownVariant, initialize as initialize_db};
pub use driver::{Driver, create_driver};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use maintenance::{MaintenanceRecord, NewMaintenanceRecord, create_maintenance_record};
pub use payment::{Payment, PaymentMethod, create_payment};
pub use rental::{RentType, Rental, RentalStatus, create_rental};
pub use report::{
    AutoMaintenanceCost, ChartPoint, DEFAULT_CHART_MONTHS, DashboardStats, MAX_REPORT_YEAR,
    MAX_TRAILING_MONTHS, MIN_REPORT_YEAR, MonthWindow, MonthlyMaintenanceCost, PaymentStatus,
    ReportRow, annual_report, dashboard_stats, income_expense_chart, maintenance_cost_per_auto,
    maintenance_cost_per_month, rental_payment_status, trailing_windows, year_windows,
};
pub use routing::build_router;
pub use store::{CountQuery, FleetStore, PaymentFilter, SQLiteFleetStore};
pub use timezone::{get_local_offset, local_date};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The data store could not answer a read.
    ///
    /// Reports fail as a whole when any of their reads fail, so the client
    /// should retry the request later rather than trust a partial result.
    #[error("the data store is unavailable: {0}")]
    StoreUnavailable(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The requested report period (year or month count) is outside the
    /// supported range.
    #[error("invalid report period: {0}")]
    InvalidPeriod(String),

    /// A negative amount of money was used to create a rent, payment or
    /// maintenance cost.
    #[error("{0} is a negative amount, which is not allowed")]
    NegativeAmount(String),

    /// A record with the same business key already exists in the database.
    #[error("a record with the ID \"{0}\" already exists")]
    DuplicateId(String),

    /// Tried to update a record that does not exist.
    #[error("tried to update a record that is not in the database")]
    UpdateMissingRecord,

    /// Tried to delete a record that does not exist.
    #[error("tried to delete a record that is not in the database")]
    DeleteMissingRecord,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 1555 occurs when a PRIMARY KEY constraint failed and 2067 when a UNIQUE
            // constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 1555 || sql_error.extended_code == 2067 =>
            {
                Error::DuplicateId(desc.clone())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::NotFound | Error::UpdateMissingRecord | Error::DeleteMissingRecord => {
                StatusCode::NOT_FOUND
            }
            Error::InvalidPeriod(_) | Error::NegativeAmount(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateId(_) => StatusCode::CONFLICT,
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            Error::StoreUnavailable(reason) => {
                tracing::error!("A report read failed: {reason}");
                self.to_string()
            }
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
            // Internal errors are not intended to be shown to the client.
            Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn store_unavailable_is_retryable() {
        let response = Error::StoreUnavailable("disk on fire".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn not_found_is_distinct_from_bad_request() {
        assert_eq!(Error::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::InvalidPeriod("year 0".to_owned())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }
}
