//! Drivers who rent autos from the fleet.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::{lock_connection, with_duplicate_id},
    endpoints::{self, format_endpoint},
};

/// A driver, identified by their `driver_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// The business key, e.g. "D-001".
    pub driver_id: String,
    /// The driver's full name.
    pub name: String,
    /// A contact phone number.
    pub phone: String,
    /// The driver's licence number.
    pub license_no: String,
    /// The driver's home address.
    pub address: String,
    /// The auto the driver usually drives.
    #[serde(default)]
    pub assigned_auto: Option<String>,
}

/// Insert a driver and return it.
pub fn create_driver(driver: Driver, connection: &Connection) -> Result<Driver, Error> {
    connection
        .execute(
            "INSERT INTO driver (driver_id, name, phone, license_no, address, assigned_auto)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            (
                &driver.driver_id,
                &driver.name,
                &driver.phone,
                &driver.license_no,
                &driver.address,
                &driver.assigned_auto,
            ),
        )
        .map_err(|error| with_duplicate_id(error.into(), &driver.driver_id))?;

    Ok(driver)
}

/// Retrieve a single driver by their business key.
pub fn get_driver(driver_id: &str, connection: &Connection) -> Result<Driver, Error> {
    connection
        .prepare(
            "SELECT driver_id, name, phone, license_no, address, assigned_auto
            FROM driver WHERE driver_id = ?1;",
        )?
        .query_row([driver_id], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all drivers ordered by their business key.
pub fn get_all_drivers(connection: &Connection) -> Result<Vec<Driver>, Error> {
    connection
        .prepare(
            "SELECT driver_id, name, phone, license_no, address, assigned_auto
            FROM driver ORDER BY driver_id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_driver| maybe_driver.map_err(|error| error.into()))
        .collect()
}

/// Replace the driver stored under `driver_id`. Returns an error if the driver doesn't exist.
pub fn update_driver(
    driver_id: &str,
    driver: Driver,
    connection: &Connection,
) -> Result<Driver, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE driver SET driver_id = ?1, name = ?2, phone = ?3, license_no = ?4,
                address = ?5, assigned_auto = ?6
            WHERE driver_id = ?7",
            (
                &driver.driver_id,
                &driver.name,
                &driver.phone,
                &driver.license_no,
                &driver.address,
                &driver.assigned_auto,
                driver_id,
            ),
        )
        .map_err(|error| with_duplicate_id(error.into(), &driver.driver_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(driver)
}

/// Delete a driver by their business key. Returns an error if the driver doesn't exist.
pub fn delete_driver(driver_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM driver WHERE driver_id = ?1", [driver_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

/// Count the registered drivers.
pub fn count_drivers(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(*) FROM driver;", [], |row| row.get::<_, i64>(0))
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Initialize the driver table.
pub fn create_driver_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS driver (
            driver_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            license_no TEXT NOT NULL,
            address TEXT NOT NULL,
            assigned_auto TEXT
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Driver, rusqlite::Error> {
    Ok(Driver {
        driver_id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        license_no: row.get(3)?,
        address: row.get(4)?,
        assigned_auto: row.get(5)?,
    })
}

/// List every driver.
pub async fn list_drivers_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
) -> Result<Json<Vec<Driver>>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_all_drivers(&connection).map(Json)
}

/// Get one driver by their business key.
pub async fn get_driver_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(driver_id): Path<String>,
) -> Result<Json<Driver>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_driver(&driver_id, &connection).map(Json)
}

/// Register a driver.
pub async fn create_driver_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Json(driver): Json<Driver>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Driver>), Error> {
    let connection = lock_connection(&db_connection)?;

    let driver = create_driver(driver, &connection)
        .inspect_err(|error| tracing::warn!("could not create driver: {error}"))?;

    let location = format_endpoint(endpoints::DRIVER, &driver.driver_id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(driver)))
}

/// Replace a driver's details.
pub async fn update_driver_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(driver_id): Path<String>,
    Json(driver): Json<Driver>,
) -> Result<Json<Driver>, Error> {
    let connection = lock_connection(&db_connection)?;

    update_driver(&driver_id, driver, &connection).map(Json)
}

/// Remove a driver.
pub async fn delete_driver_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(driver_id): Path<String>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&db_connection)?;

    delete_driver(&driver_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
