//! Rental contracts between the fleet and its drivers.

use std::{
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

/// How often rent is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentType {
    /// Charged per day.
    Daily,
    /// Charged per week.
    Weekly,
    /// Charged per month.
    Monthly,
}

impl RentType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for RentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(UnknownVariant::new("rent type", other)),
        }
    }
}

/// Whether a rental is still running.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    /// The driver still has the auto.
    #[default]
    Active,
    /// The auto has been returned.
    Completed,
}

impl RentalStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for RentalStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownVariant::new("rental status", other)),
        }
    }
}

/// A rental contract, identified by its `rental_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    /// The business key, e.g. "R-001".
    pub rental_id: String,
    /// The driver renting the auto.
    pub driver_id: String,
    /// The auto being rented.
    pub auto_id: String,
    /// How often rent is charged.
    pub rent_type: RentType,
    /// The contracted rent.
    pub rent_amount: Decimal,
    /// The first day of the rental.
    pub start_date: Date,
    /// The day the rent is due in full, if agreed.
    #[serde(default)]
    pub end_date: Option<Date>,
    /// Whether the rental is still running.
    #[serde(default)]
    pub status: RentalStatus,
}

/// Insert a rental and return it.
///
/// # Errors
/// Returns [Error::NegativeAmount] if the rent is negative, or
/// [Error::DuplicateId] if the rental ID is taken.
pub fn create_rental(rental: Rental, connection: &Connection) -> Result<Rental, Error> {
    ensure_non_negative(rental.rent_amount)?;

    connection
        .execute(
            "INSERT INTO rental
                (rental_id, driver_id, auto_id, rent_type, rent_amount, start_date, end_date, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            (
                &rental.rental_id,
                &rental.driver_id,
                &rental.auto_id,
                rental.rent_type.as_str(),
                rental.rent_amount.to_string(),
                rental.start_date,
                rental.end_date,
                rental.status.as_str(),
            ),
        )
        .map_err(|error| with_duplicate_id(error.into(), &rental.rental_id))?;

    Ok(rental)
}

/// Retrieve a single rental by its business key.
pub fn get_rental(rental_id: &str, connection: &Connection) -> Result<Rental, Error> {
    connection
        .prepare(
            "SELECT rental_id, driver_id, auto_id, rent_type, rent_amount, start_date, end_date, status
            FROM rental WHERE rental_id = ?1;",
        )?
        .query_row([rental_id], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all rentals, newest first.
pub fn get_all_rentals(connection: &Connection) -> Result<Vec<Rental>, Error> {
    connection
        .prepare(
            "SELECT rental_id, driver_id, auto_id, rent_type, rent_amount, start_date, end_date, status
            FROM rental ORDER BY start_date DESC, rental_id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_rental| maybe_rental.map_err(|error| error.into()))
        .collect()
}

/// Replace the rental stored under `rental_id`. Returns an error if the rental doesn't exist.
pub fn update_rental(
    rental_id: &str,
    rental: Rental,
    connection: &Connection,
) -> Result<Rental, Error> {
    ensure_non_negative(rental.rent_amount)?;

    let rows_affected = connection
        .execute(
            "UPDATE rental SET rental_id = ?1, driver_id = ?2, auto_id = ?3, rent_type = ?4,
                rent_amount = ?5, start_date = ?6, end_date = ?7, status = ?8
            WHERE rental_id = ?9",
            (
                &rental.rental_id,
                &rental.driver_id,
                &rental.auto_id,
                rental.rent_type.as_str(),
                rental.rent_amount.to_string(),
                rental.start_date,
                rental.end_date,
                rental.status.as_str(),
                rental_id,
            ),
        )
        .map_err(|error| with_duplicate_id(error.into(), &rental.rental_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(rental)
}

/// Delete a rental by its business key. Returns an error if the rental doesn't exist.
pub fn delete_rental(rental_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM rental WHERE rental_id = ?1", [rental_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

/// Count the rentals with `status`.
pub fn count_rentals_with_status(
    status: RentalStatus,
    connection: &Connection,
) -> Result<u64, Error> {
    connection
        .query_row(
            "SELECT COUNT(*) FROM rental WHERE status = ?1;",
            [status.as_str()],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Initialize the rental table.
pub fn create_rental_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS rental (
            rental_id TEXT PRIMARY KEY,
            driver_id TEXT NOT NULL,
            auto_id TEXT NOT NULL,
            rent_type TEXT NOT NULL,
            rent_amount TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT,
            status TEXT NOT NULL DEFAULT 'active'
        );

        CREATE INDEX IF NOT EXISTS idx_rental_status ON rental(status);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Rental, rusqlite::Error> {
    Ok(Rental {
        rental_id: row.get(0)?,
        driver_id: row.get(1)?,
        auto_id: row.get(2)?,
        rent_type: get_parsed(row, 3)?,
        rent_amount: get_decimal(row, 4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        status: get_parsed(row, 7)?,
    })
}

/// List every rental.
pub async fn list_rentals_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
) -> Result<Json<Vec<Rental>>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_all_rentals(&connection).map(Json)
}

/// Get one rental by its business key.
pub async fn get_rental_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(rental_id): Path<String>,
) -> Result<Json<Rental>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_rental(&rental_id, &connection).map(Json)
}

/// Record a new rental.
pub async fn create_rental_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Json(rental): Json<Rental>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Rental>), Error> {
    let connection = lock_connection(&db_connection)?;

    let rental = create_rental(rental, &connection)
        .inspect_err(|error| tracing::warn!("could not create rental: {error}"))?;

    let location = format_endpoint(endpoints::RENTAL, &rental.rental_id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(rental)))
}

/// Replace a rental's details, e.g. to mark it completed.
pub async fn update_rental_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(rental_id): Path<String>,
    Json(rental): Json<Rental>,
) -> Result<Json<Rental>, Error> {
    let connection = lock_connection(&db_connection)?;

    update_rental(&rental_id, rental, &connection).map(Json)
}

/// Remove a rental.
pub async fn delete_rental_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(rental_id): Path<String>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&db_connection)?;

    delete_rental(&rental_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
pub(crate) fn test_rental(rental_id: &str, rent_amount: Decimal, end_date: Option<Date>) -> Rental {
    Rental {
        rental_id: rental_id.to_owned(),
        driver_id: "D-1".to_owned(),
        auto_id: "A-1".to_owned(),
        rent_type: RentType::Monthly,
        rent_amount,
        start_date: time::macros::date!(2024 - 01 - 01),
        end_date,
        status: RentalStatus::Active,
    }
}
