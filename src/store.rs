//! The read-only view of fleet records that the reports are computed from.

use std::{
    future::Future,
    ops::Range,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    auto::count_autos,
    driver::count_drivers,
    maintenance::{MaintenanceRecord, get_maintenance_records},
    payment::{Payment, get_payments_for_rental, get_payments_in_date_range},
    rental::{Rental, RentalStatus, count_rentals_with_status, get_rental},
};

/// The kinds of record the reports count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountQuery {
    /// Every auto in the fleet.
    Autos,
    /// Every registered driver.
    Drivers,
    /// The rentals with the given status.
    Rentals(RentalStatus),
}

/// Which payments to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentFilter {
    /// Payments dated on or after `start` and before `end`.
    DateRange(Range<Date>),
    /// Payments made against the rental with this ID.
    Rental(String),
}

/// Reads fleet records for the reports.
///
/// Implementations must never modify records. Reads are independent of each
/// other, so callers may issue several at once and join them.
///
/// Every method returns [Error::StoreUnavailable] when the read itself fails.
/// An empty result is not an error.
pub trait FleetStore: Send + Sync {
    /// Count the records matching `query`.
    fn count(&self, query: CountQuery) -> impl Future<Output = Result<u64, Error>> + Send;

    /// List the payments matching `filter`.
    fn list_payments(
        &self,
        filter: PaymentFilter,
    ) -> impl Future<Output = Result<Vec<Payment>, Error>> + Send;

    /// List maintenance records in `date_range`, or all of them for `None`.
    fn list_maintenance(
        &self,
        date_range: Option<Range<Date>>,
    ) -> impl Future<Output = Result<Vec<MaintenanceRecord>, Error>> + Send;

    /// Get a rental by ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no rental with `rental_id`.
    fn get_rental(&self, rental_id: &str) -> impl Future<Output = Result<Rental, Error>> + Send;
}

/// A [FleetStore] backed by the application's SQLite database.
///
/// Queries run on tokio's blocking thread pool so that awaiting them does not
/// stall the async runtime.
#[derive(Debug, Clone)]
pub struct SQLiteFleetStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteFleetStore {
    /// Create a store that reads through `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    async fn read<T, F>(&self, query: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
    {
        let connection = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let connection = connection.lock().map_err(|error| {
                tracing::error!("could not acquire database lock: {error}");
                Error::StoreUnavailable("the database lock is poisoned".to_owned())
            })?;

            query(&connection).map_err(into_store_error)
        })
        .await
        .map_err(|error| {
            tracing::error!("a database read task failed: {error}");
            Error::StoreUnavailable(error.to_string())
        })?
    }
}

/// Keep [Error::NotFound] so callers can tell a missing record from a failed read.
fn into_store_error(error: Error) -> Error {
    match error {
        Error::NotFound | Error::StoreUnavailable(_) => error,
        other => Error::StoreUnavailable(other.to_string()),
    }
}

impl FleetStore for SQLiteFleetStore {
    async fn count(&self, query: CountQuery) -> Result<u64, Error> {
        self.read(move |connection| match query {
            CountQuery::Autos => count_autos(connection),
            CountQuery::Drivers => count_drivers(connection),
            CountQuery::Rentals(status) => count_rentals_with_status(status, connection),
        })
        .await
    }

    async fn list_payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>, Error> {
        self.read(move |connection| match filter {
            PaymentFilter::DateRange(date_range) => {
                get_payments_in_date_range(date_range, connection)
            }
            PaymentFilter::Rental(rental_id) => get_payments_for_rental(&rental_id, connection),
        })
        .await
    }

    async fn list_maintenance(
        &self,
        date_range: Option<Range<Date>>,
    ) -> Result<Vec<MaintenanceRecord>, Error> {
        self.read(move |connection| get_maintenance_records(date_range, connection))
            .await
    }

    async fn get_rental(&self, rental_id: &str) -> Result<Rental, Error> {
        let rental_id = rental_id.to_owned();

        self.read(move |connection| get_rental(&rental_id, connection))
            .await
    }
}

#[cfg(test)]
mod sqlite_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        db::get_test_connection,
        payment::{create_payment, test_payment},
        rental::{RentalStatus, create_rental, test_rental},
    };

    use super::{CountQuery, FleetStore, PaymentFilter, SQLiteFleetStore};

    fn get_test_store() -> (SQLiteFleetStore, Arc<Mutex<Connection>>) {
        let connection = Arc::new(Mutex::new(get_test_connection()));

        (SQLiteFleetStore::new(connection.clone()), connection)
    }

    #[tokio::test]
    async fn counts_rentals_by_status() {
        let (store, connection) = get_test_store();
        create_rental(
            test_rental("R-1", dec!(100), None),
            &connection.lock().unwrap(),
        )
        .unwrap();

        let active = store
            .count(CountQuery::Rentals(RentalStatus::Active))
            .await;
        let completed = store
            .count(CountQuery::Rentals(RentalStatus::Completed))
            .await;

        assert_eq!(active, Ok(1));
        assert_eq!(completed, Ok(0));
    }

    #[tokio::test]
    async fn lists_payments_by_rental_and_by_date() {
        let (store, connection) = get_test_store();
        {
            let connection = connection.lock().unwrap();
            create_payment(
                test_payment("P-1", "R-1", date!(2024 - 01 - 10), dec!(5)),
                &connection,
            )
            .unwrap();
            create_payment(
                test_payment("P-2", "R-2", date!(2024 - 02 - 10), dec!(7)),
                &connection,
            )
            .unwrap();
        }

        let for_rental = store
            .list_payments(PaymentFilter::Rental("R-2".to_owned()))
            .await
            .unwrap();
        let in_january = store
            .list_payments(PaymentFilter::DateRange(
                date!(2024 - 01 - 01)..date!(2024 - 02 - 01),
            ))
            .await
            .unwrap();

        assert_eq!(for_rental[0].payment_id, "P-2");
        assert_eq!(in_january.len(), 1);
        assert_eq!(in_january[0].payment_id, "P-1");
    }

    #[tokio::test]
    async fn missing_rental_is_not_found() {
        let (store, _connection) = get_test_store();

        assert_eq!(store.get_rental("R-404").await, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn missing_table_is_store_unavailable() {
        let connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let store = SQLiteFleetStore::new(connection);

        let got = store.count(CountQuery::Autos).await;

        assert!(
            matches!(got, Err(Error::StoreUnavailable(_))),
            "want StoreUnavailable, got {got:?}"
        );
    }
}
