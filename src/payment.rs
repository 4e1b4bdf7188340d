//! Payments received against rentals.

use std::{
    ops::Range,
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
};
use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    db::{
        UnknownVariant, ensure_non_negative, get_decimal, get_parsed, lock_connection,
        with_duplicate_id,
    },
    endpoints::{self, format_endpoint},
};

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid in person.
    Cash,
    /// Paid by bank transfer or UPI.
    Online,
}

impl PaymentMethod {
    fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Online => "online",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "online" => Ok(Self::Online),
            other => Err(UnknownVariant::new("payment method", other)),
        }
    }
}

/// Money received for a rental, identified by its `payment_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// The business key, e.g. "P-001".
    pub payment_id: String,
    /// The rental this payment is for.
    pub rental_id: String,
    /// The day the money was received.
    pub date: Date,
    /// How much was received.
    pub amount_paid: Decimal,
    /// How the money was received.
    pub method: PaymentMethod,
}

const SELECT_PAYMENT: &str = "SELECT payment_id, rental_id, date, amount_paid, method FROM payment";

/// Insert a payment and return it.
///
/// # Errors
/// Returns [Error::NegativeAmount] if the amount is negative, or
/// [Error::DuplicateId] if the payment ID is taken.
pub fn create_payment(payment: Payment, connection: &Connection) -> Result<Payment, Error> {
    ensure_non_negative(payment.amount_paid)?;

    connection
        .execute(
            "INSERT INTO payment (payment_id, rental_id, date, amount_paid, method)
            VALUES (?1, ?2, ?3, ?4, ?5);",
            (
                &payment.payment_id,
                &payment.rental_id,
                payment.date,
                payment.amount_paid.to_string(),
                payment.method.as_str(),
            ),
        )
        .map_err(|error| with_duplicate_id(error.into(), &payment.payment_id))?;

    Ok(payment)
}

/// Retrieve a single payment by its business key.
pub fn get_payment(payment_id: &str, connection: &Connection) -> Result<Payment, Error> {
    connection
        .prepare(&format!("{SELECT_PAYMENT} WHERE payment_id = ?1;"))?
        .query_row([payment_id], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all payments in date order.
pub fn get_all_payments(connection: &Connection) -> Result<Vec<Payment>, Error> {
    connection
        .prepare(&format!("{SELECT_PAYMENT} ORDER BY date ASC, payment_id ASC;"))?
        .query_map([], map_row)?
        .map(|maybe_payment| maybe_payment.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the payments received on or after `date_range.start` and before
/// `date_range.end`.
pub fn get_payments_in_date_range(
    date_range: Range<Date>,
    connection: &Connection,
) -> Result<Vec<Payment>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_PAYMENT} WHERE date >= ?1 AND date < ?2 ORDER BY date ASC;"
        ))?
        .query_map((date_range.start, date_range.end), map_row)?
        .map(|maybe_payment| maybe_payment.map_err(|error| error.into()))
        .collect()
}

/// Retrieve every payment made against `rental_id`.
pub fn get_payments_for_rental(
    rental_id: &str,
    connection: &Connection,
) -> Result<Vec<Payment>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_PAYMENT} WHERE rental_id = ?1 ORDER BY date ASC;"
        ))?
        .query_map([rental_id], map_row)?
        .map(|maybe_payment| maybe_payment.map_err(|error| error.into()))
        .collect()
}

/// Replace the payment stored under `payment_id`. Returns an error if the payment doesn't exist.
pub fn update_payment(
    payment_id: &str,
    payment: Payment,
    connection: &Connection,
) -> Result<Payment, Error> {
    ensure_non_negative(payment.amount_paid)?;

    let rows_affected = connection
        .execute(
            "UPDATE payment SET payment_id = ?1, rental_id = ?2, date = ?3, amount_paid = ?4,
                method = ?5
            WHERE payment_id = ?6",
            (
                &payment.payment_id,
                &payment.rental_id,
                payment.date,
                payment.amount_paid.to_string(),
                payment.method.as_str(),
                payment_id,
            ),
        )
        .map_err(|error| with_duplicate_id(error.into(), &payment.payment_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(payment)
}

/// Delete a payment by its business key. Returns an error if the payment doesn't exist.
pub fn delete_payment(payment_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM payment WHERE payment_id = ?1", [payment_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

/// Initialize the payment table and indexes.
pub fn create_payment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS payment (
            payment_id TEXT PRIMARY KEY,
            rental_id TEXT NOT NULL,
            date TEXT NOT NULL,
            amount_paid TEXT NOT NULL,
            method TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_payment_date ON payment(date);
        CREATE INDEX IF NOT EXISTS idx_payment_rental_id ON payment(rental_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Payment, rusqlite::Error> {
    Ok(Payment {
        payment_id: row.get(0)?,
        rental_id: row.get(1)?,
        date: row.get(2)?,
        amount_paid: get_decimal(row, 3)?,
        method: get_parsed(row, 4)?,
    })
}

/// List every payment.
pub async fn list_payments_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
) -> Result<Json<Vec<Payment>>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_all_payments(&connection).map(Json)
}

/// Get one payment by its business key.
pub async fn get_payment_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(payment_id): Path<String>,
) -> Result<Json<Payment>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_payment(&payment_id, &connection).map(Json)
}

/// Record a payment.
pub async fn create_payment_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Json(payment): Json<Payment>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Payment>), Error> {
    let connection = lock_connection(&db_connection)?;

    let payment = create_payment(payment, &connection)
        .inspect_err(|error| tracing::warn!("could not create payment: {error}"))?;

    let location = format_endpoint(endpoints::PAYMENT, &payment.payment_id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(payment)))
}

/// Replace a payment's details.
pub async fn update_payment_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(payment_id): Path<String>,
    Json(payment): Json<Payment>,
) -> Result<Json<Payment>, Error> {
    let connection = lock_connection(&db_connection)?;

    update_payment(&payment_id, payment, &connection).map(Json)
}

/// Remove a payment.
pub async fn delete_payment_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(payment_id): Path<String>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&db_connection)?;

    delete_payment(&payment_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
pub(crate) fn test_payment(payment_id: &str, rental_id: &str, date: Date, amount: Decimal) -> Payment {
    Payment {
        payment_id: payment_id.to_owned(),
        rental_id: rental_id.to_owned(),
        date,
        amount_paid: amount,
        method: PaymentMethod::Cash,
    }
}

#[cfg(test)]
mod payment_query_tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{Error, db::get_test_connection};

    use super::{
        PaymentMethod, create_payment, delete_payment, get_all_payments, get_payment,
        get_payments_for_rental, get_payments_in_date_range, test_payment, update_payment,
    };

    #[test]
    fn create_then_get_payment() {
        let connection = get_test_connection();
        let payment = test_payment("P-1", "R-1", date!(2024 - 03 - 05), dec!(99.99));
        create_payment(payment.clone(), &connection).unwrap();

        assert_eq!(get_payment("P-1", &connection), Ok(payment));
    }

    #[test]
    fn negative_payment_is_rejected() {
        let connection = get_test_connection();

        let got = create_payment(
            test_payment("P-1", "R-1", date!(2024 - 03 - 05), dec!(-5)),
            &connection,
        );

        assert_eq!(got, Err(Error::NegativeAmount("-5".to_owned())));
    }

    #[test]
    fn date_range_is_half_open() {
        let connection = get_test_connection();
        for (id, date) in [
            ("P-1", date!(2024 - 02 - 29)),
            ("P-2", date!(2024 - 03 - 01)),
            ("P-3", date!(2024 - 03 - 31)),
            ("P-4", date!(2024 - 04 - 01)),
        ] {
            create_payment(test_payment(id, "R-1", date, dec!(10)), &connection).unwrap();
        }

        let got: Vec<String> =
            get_payments_in_date_range(date!(2024 - 03 - 01)..date!(2024 - 04 - 01), &connection)
                .unwrap()
                .into_iter()
                .map(|payment| payment.payment_id)
                .collect();

        assert_eq!(got, vec!["P-2", "P-3"]);
    }

    #[test]
    fn payments_for_rental_only_returns_that_rental() {
        let connection = get_test_connection();
        create_payment(
            test_payment("P-1", "R-1", date!(2024 - 03 - 05), dec!(10)),
            &connection,
        )
        .unwrap();
        create_payment(
            test_payment("P-2", "R-2", date!(2024 - 03 - 05), dec!(20)),
            &connection,
        )
        .unwrap();

        let got = get_payments_for_rental("R-2", &connection).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].payment_id, "P-2");
    }

    #[test]
    fn update_and_delete_payment() {
        let connection = get_test_connection();
        create_payment(
            test_payment("P-1", "R-1", date!(2024 - 03 - 05), dec!(10)),
            &connection,
        )
        .unwrap();
        let mut changed = test_payment("P-1", "R-1", date!(2024 - 03 - 06), dec!(15));
        changed.method = PaymentMethod::Online;

        update_payment("P-1", changed.clone(), &connection).unwrap();
        assert_eq!(get_payment("P-1", &connection), Ok(changed));

        delete_payment("P-1", &connection).unwrap();
        assert_eq!(get_all_payments(&connection), Ok(vec![]));
    }
}
