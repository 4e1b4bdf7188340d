//! Maintenance work done on autos and what it cost.

use std::{
    ops::Range,
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
    database_id::DatabaseId,
    db::{ensure_non_negative, get_decimal, lock_connection},
    endpoints::{self, format_endpoint},
};

/// The details of maintenance work before it is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMaintenanceRecord {
    /// The auto that was serviced.
    pub auto_id: String,
    /// The day the work was done.
    pub date: Date,
    /// What was done.
    pub description: String,
    /// What the work cost.
    pub cost: Decimal,
}

/// Maintenance work that has been saved to the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// The database ID.
    pub id: DatabaseId,
    /// The auto that was serviced.
    pub auto_id: String,
    /// The day the work was done.
    pub date: Date,
    /// What was done.
    pub description: String,
    /// What the work cost.
    pub cost: Decimal,
}

impl MaintenanceRecord {
    fn from_new(id: DatabaseId, record: NewMaintenanceRecord) -> Self {
        Self {
            id,
            auto_id: record.auto_id,
            date: record.date,
            description: record.description,
            cost: record.cost,
        }
    }
}

const SELECT_MAINTENANCE: &str = "SELECT id, auto_id, date, description, cost FROM maintenance";

/// Create a maintenance record and return it with its generated ID.
///
/// # Errors
/// Returns [Error::NegativeAmount] if the cost is negative.
pub fn create_maintenance_record(
    record: NewMaintenanceRecord,
    connection: &Connection,
) -> Result<MaintenanceRecord, Error> {
    ensure_non_negative(record.cost)?;

    connection.execute(
        "INSERT INTO maintenance (auto_id, date, description, cost) VALUES (?1, ?2, ?3, ?4);",
        (
            &record.auto_id,
            record.date,
            &record.description,
            record.cost.to_string(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(MaintenanceRecord::from_new(id, record))
}

/// Retrieve a single maintenance record by ID.
pub fn get_maintenance_record(
    id: DatabaseId,
    connection: &Connection,
) -> Result<MaintenanceRecord, Error> {
    connection
        .prepare(&format!("{SELECT_MAINTENANCE} WHERE id = :id;"))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve maintenance records in date order.
///
/// With `Some(date_range)`, only records on or after `date_range.start` and
/// before `date_range.end` are returned. With `None`, every record is returned.
pub fn get_maintenance_records(
    date_range: Option<Range<Date>>,
    connection: &Connection,
) -> Result<Vec<MaintenanceRecord>, Error> {
    match date_range {
        Some(date_range) => connection
            .prepare(&format!(
                "{SELECT_MAINTENANCE} WHERE date >= ?1 AND date < ?2 ORDER BY date ASC, id ASC;"
            ))?
            .query_map((date_range.start, date_range.end), map_row)?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect(),
        None => connection
            .prepare(&format!("{SELECT_MAINTENANCE} ORDER BY date ASC, id ASC;"))?
            .query_map([], map_row)?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect(),
    }
}

/// Replace the maintenance record `id`. Returns an error if the record doesn't exist.
pub fn update_maintenance_record(
    id: DatabaseId,
    record: NewMaintenanceRecord,
    connection: &Connection,
) -> Result<MaintenanceRecord, Error> {
    ensure_non_negative(record.cost)?;

    let rows_affected = connection.execute(
        "UPDATE maintenance SET auto_id = ?1, date = ?2, description = ?3, cost = ?4
        WHERE id = ?5",
        (
            &record.auto_id,
            record.date,
            &record.description,
            record.cost.to_string(),
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(MaintenanceRecord::from_new(id, record))
}

/// Delete a maintenance record by ID. Returns an error if the record doesn't exist.
pub fn delete_maintenance_record(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM maintenance WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

/// Initialize the maintenance table and indexes.
pub fn create_maintenance_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS maintenance (
            id INTEGER PRIMARY KEY,
            auto_id TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            cost TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_maintenance_date ON maintenance(date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<MaintenanceRecord, rusqlite::Error> {
    Ok(MaintenanceRecord {
        id: row.get(0)?,
        auto_id: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        cost: get_decimal(row, 4)?,
    })
}

/// List every maintenance record.
pub async fn list_maintenance_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
) -> Result<Json<Vec<MaintenanceRecord>>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_maintenance_records(None, &connection).map(Json)
}

/// Get one maintenance record by ID.
pub async fn get_maintenance_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(maintenance_id): Path<DatabaseId>,
) -> Result<Json<MaintenanceRecord>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_maintenance_record(maintenance_id, &connection).map(Json)
}

/// Record maintenance work.
pub async fn create_maintenance_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Json(record): Json<NewMaintenanceRecord>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<MaintenanceRecord>), Error> {
    let connection = lock_connection(&db_connection)?;

    let record = create_maintenance_record(record, &connection)
        .inspect_err(|error| tracing::warn!("could not create maintenance record: {error}"))?;

    let location = format_endpoint(endpoints::MAINTENANCE_RECORD, &record.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(record)))
}

/// Replace a maintenance record.
pub async fn update_maintenance_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(maintenance_id): Path<DatabaseId>,
    Json(record): Json<NewMaintenanceRecord>,
) -> Result<Json<MaintenanceRecord>, Error> {
    let connection = lock_connection(&db_connection)?;

    update_maintenance_record(maintenance_id, record, &connection).map(Json)
}

/// Remove a maintenance record.
pub async fn delete_maintenance_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(maintenance_id): Path<DatabaseId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&db_connection)?;

    delete_maintenance_record(maintenance_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
pub(crate) fn test_maintenance(auto_id: &str, date: Date, cost: Decimal) -> NewMaintenanceRecord {
    NewMaintenanceRecord {
        auto_id: auto_id.to_owned(),
        date,
        description: "Oil change".to_owned(),
        cost,
    }
}
