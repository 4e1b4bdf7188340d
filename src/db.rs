//! Database schema setup and column helpers shared by the record modules.

use std::{
    fmt::Display,
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, Transaction as SqlTransaction, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error, auto::create_auto_table, driver::create_driver_table,
    maintenance::create_maintenance_table, payment::create_payment_table,
    rental::create_rental_table,
};

/// Create all the tables for the fleet records.
///
/// Safe to call on an existing database, tables that already exist are left untouched.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_auto_table(&transaction)?;
    create_driver_table(&transaction)?;
    create_rental_table(&transaction)?;
    create_payment_table(&transaction)?;
    create_maintenance_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a money column.
///
/// Money is stored as TEXT so that it round trips through SQLite without
/// passing through a float.
pub(crate) fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(index)?;

    Decimal::from_str(&raw).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

/// Read a TEXT column holding one of the record enums, e.g. a rental status.
pub(crate) fn get_parsed<T>(row: &Row, index: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(index)?;

    raw.parse()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// The error returned when text does not name a known record enum value,
/// e.g. a fuel type of "hydrogen".
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: impl Display) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Acquire the shared database connection for a request handler.
pub(crate) fn lock_connection(
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// Reject negative amounts of money before they reach the database.
pub(crate) fn ensure_non_negative(amount: Decimal) -> Result<Decimal, Error> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::NegativeAmount(amount.to_string()));
    }

    Ok(amount)
}

/// Replace the constraint description in [Error::DuplicateId] with the
/// business key that clashed.
pub(crate) fn with_duplicate_id(error: Error, id: &str) -> Error {
    match error {
        Error::DuplicateId(_) => Error::DuplicateId(id.to_owned()),
        error => error,
    }
}

#[cfg(test)]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    connection
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{Error, FuelType, PaymentMethod, RentalStatus, UnknownVariant};

    use super::{ensure_non_negative, get_decimal, initialize};

    #[test]
    fn unknown_enum_text_names_kind_and_value() {
        let fuel: Result<FuelType, UnknownVariant> = "hydrogen".parse();
        let method: Result<PaymentMethod, UnknownVariant> = "cheque".parse();
        let status: Result<RentalStatus, UnknownVariant> = "archived".parse();

        assert_eq!(
            fuel.unwrap_err().to_string(),
            "unknown fuel type \"hydrogen\""
        );
        assert_eq!(
            method.unwrap_err().to_string(),
            "unknown payment method \"cheque\""
        );
        assert_eq!(
            status.unwrap_err().to_string(),
            "unknown rental status \"archived\""
        );
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialize failed");
        initialize(&connection).expect("second initialize failed");
    }

    #[test]
    fn decimal_column_round_trips_exactly() {
        let connection = Connection::open_in_memory().unwrap();

        let got = connection
            .query_row("SELECT '0.10' ", [], |row| get_decimal(row, 0))
            .unwrap();

        assert_eq!(got, dec!(0.10));
    }

    #[test]
    fn decimal_column_rejects_garbage() {
        let connection = Connection::open_in_memory().unwrap();

        let got = connection.query_row("SELECT 'ten dollars'", [], |row| get_decimal(row, 0));

        assert!(got.is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert_eq!(ensure_non_negative(dec!(0)), Ok(dec!(0)));
        assert_eq!(ensure_non_negative(dec!(12.5)), Ok(dec!(12.5)));
        assert_eq!(
            ensure_non_negative(dec!(-0.01)),
            Err(Error::NegativeAmount("-0.01".to_owned()))
        );
    }
}
