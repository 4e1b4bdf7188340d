//! Autos: the vehicles in the fleet.

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
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    db::{UnknownVariant, get_parsed, lock_connection, with_duplicate_id},
    endpoints::{self, format_endpoint},
};

/// What an auto runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    /// Electric.
    #[serde(rename = "EV")]
    Ev,
    /// Compressed natural gas.
    #[serde(rename = "CNG")]
    Cng,
    /// Petrol or diesel.
    Fuel,
}

impl FuelType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Ev => "EV",
            Self::Cng => "CNG",
            Self::Fuel => "Fuel",
        }
    }
}

impl FromStr for FuelType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EV" => Ok(Self::Ev),
            "CNG" => Ok(Self::Cng),
            "Fuel" => Ok(Self::Fuel),
            other => Err(UnknownVariant::new("fuel type", other)),
        }
    }
}

/// Whether an auto is available for rent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoStatus {
    /// On the road.
    #[default]
    Active,
    /// Parked and not available.
    Inactive,
    /// In the workshop.
    Maintenance,
}

impl AutoStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
        }
    }
}

impl FromStr for AutoStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(UnknownVariant::new("auto status", other)),
        }
    }
}

/// A vehicle in the fleet, identified by its `auto_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auto {
    /// The business key, e.g. "A-001".
    pub auto_id: String,
    /// The make and model.
    pub model: String,
    /// The registration plate.
    pub number: String,
    /// What the auto runs on.
    #[serde(rename = "type")]
    pub fuel_type: FuelType,
    /// When the fleet bought the auto.
    pub purchase_date: Date,
    /// Whether the auto is available.
    #[serde(default)]
    pub status: AutoStatus,
    /// Where a photo of the auto is hosted.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Insert an auto and return it.
pub fn create_auto(auto: Auto, connection: &Connection) -> Result<Auto, Error> {
    connection
        .execute(
            "INSERT INTO auto (auto_id, model, number, fuel_type, purchase_date, status, image_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            (
                &auto.auto_id,
                &auto.model,
                &auto.number,
                auto.fuel_type.as_str(),
                auto.purchase_date,
                auto.status.as_str(),
                &auto.image_url,
            ),
        )
        .map_err(|error| with_duplicate_id(error.into(), &auto.auto_id))?;

    Ok(auto)
}

/// Retrieve a single auto by its business key.
pub fn get_auto(auto_id: &str, connection: &Connection) -> Result<Auto, Error> {
    connection
        .prepare(
            "SELECT auto_id, model, number, fuel_type, purchase_date, status, image_url
            FROM auto WHERE auto_id = ?1;",
        )?
        .query_row([auto_id], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all autos ordered by their business key.
pub fn get_all_autos(connection: &Connection) -> Result<Vec<Auto>, Error> {
    connection
        .prepare(
            "SELECT auto_id, model, number, fuel_type, purchase_date, status, image_url
            FROM auto ORDER BY auto_id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_auto| maybe_auto.map_err(|error| error.into()))
        .collect()
}

/// Replace the auto stored under `auto_id`. Returns an error if the auto doesn't exist.
pub fn update_auto(auto_id: &str, auto: Auto, connection: &Connection) -> Result<Auto, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE auto SET auto_id = ?1, model = ?2, number = ?3, fuel_type = ?4,
                purchase_date = ?5, status = ?6, image_url = ?7
            WHERE auto_id = ?8",
            (
                &auto.auto_id,
                &auto.model,
                &auto.number,
                auto.fuel_type.as_str(),
                auto.purchase_date,
                auto.status.as_str(),
                &auto.image_url,
                auto_id,
            ),
        )
        .map_err(|error| with_duplicate_id(error.into(), &auto.auto_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(auto)
}

/// Delete an auto by its business key. Returns an error if the auto doesn't exist.
pub fn delete_auto(auto_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM auto WHERE auto_id = ?1", [auto_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

/// Count the autos in the fleet.
pub fn count_autos(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(*) FROM auto;", [], |row| row.get::<_, i64>(0))
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Initialize the auto table.
pub fn create_auto_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS auto (
            auto_id TEXT PRIMARY KEY,
            model TEXT NOT NULL,
            number TEXT NOT NULL,
            fuel_type TEXT NOT NULL,
            purchase_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            image_url TEXT
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Auto, rusqlite::Error> {
    Ok(Auto {
        auto_id: row.get(0)?,
        model: row.get(1)?,
        number: row.get(2)?,
        fuel_type: get_parsed(row, 3)?,
        purchase_date: row.get(4)?,
        status: get_parsed(row, 5)?,
        image_url: row.get(6)?,
    })
}

/// List every auto in the fleet.
pub async fn list_autos_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
) -> Result<Json<Vec<Auto>>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_all_autos(&connection).map(Json)
}

/// Get one auto by its business key.
pub async fn get_auto_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(auto_id): Path<String>,
) -> Result<Json<Auto>, Error> {
    let connection = lock_connection(&db_connection)?;

    get_auto(&auto_id, &connection).map(Json)
}

/// Add an auto to the fleet.
pub async fn create_auto_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Json(auto): Json<Auto>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Auto>), Error> {
    let connection = lock_connection(&db_connection)?;

    let auto = create_auto(auto, &connection)
        .inspect_err(|error| tracing::warn!("could not create auto: {error}"))?;

    let location = format_endpoint(endpoints::AUTO, &auto.auto_id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(auto)))
}

/// Replace an auto's details.
pub async fn update_auto_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(auto_id): Path<String>,
    Json(auto): Json<Auto>,
) -> Result<Json<Auto>, Error> {
    let connection = lock_connection(&db_connection)?;

    update_auto(&auto_id, auto, &connection).map(Json)
}

/// Remove an auto from the fleet.
pub async fn delete_auto_endpoint(
    State(db_connection): State<Arc<Mutex<Connection>>>,
    Path(auto_id): Path<String>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&db_connection)?;

    delete_auto(&auto_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}


#[cfg(test)]
mod auto_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        db::get_test_connection,
        endpoints::{self, format_endpoint},
    };

    use super::{
        Auto, AutoStatus, create_auto_endpoint, delete_auto_endpoint, get_auto_endpoint,
        list_autos_endpoint, update_auto_endpoint,
    };

    fn get_test_server() -> TestServer {
        let state = Arc::new(Mutex::new(get_test_connection()));
        let app = Router::new()
            .route(
                endpoints::AUTOS,
                post(create_auto_endpoint).get(list_autos_endpoint),
            )
            .route(
                endpoints::AUTO,
                get(get_auto_endpoint)
                    .put(update_auto_endpoint)
                    .delete(delete_auto_endpoint),
            )
            .with_state(state);

        TestServer::new(app)
    }

    fn auto_json() -> serde_json::Value {
        json!({
            "auto_id": "A-1",
            "model": "Piaggio Ape",
            "number": "MH-12-9999",
            "type": "EV",
            "purchase_date": "2024-02-10"
        })
    }

    #[tokio::test]
    async fn create_auto_defaults_to_active() {
        let server = get_test_server();

        let response = server.post(endpoints::AUTOS).json(&auto_json()).await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(
            response.header("location"),
            format_endpoint(endpoints::AUTO, "A-1")
        );
        let auto: Auto = response.json();
        assert_eq!(auto.status, AutoStatus::Active);
        assert_eq!(auto.image_url, None);
    }

    #[tokio::test]
    async fn duplicate_auto_is_a_conflict() {
        let server = get_test_server();
        server.post(endpoints::AUTOS).json(&auto_json()).await;

        server
            .post(endpoints::AUTOS)
            .json(&auto_json())
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn get_update_and_delete_auto() {
        let server = get_test_server();
        server.post(endpoints::AUTOS).json(&auto_json()).await;
        let auto_url = format_endpoint(endpoints::AUTO, "A-1");

        server.get(&auto_url).await.assert_status_ok();

        let mut changed = auto_json();
        changed["status"] = json!("inactive");
        let updated: Auto = server.put(&auto_url).json(&changed).await.json();
        assert_eq!(updated.status, AutoStatus::Inactive);

        server
            .delete(&auto_url)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server.get(&auto_url).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn list_autos_returns_all() {
        let server = get_test_server();
        server.post(endpoints::AUTOS).json(&auto_json()).await;

        let autos: Vec<Auto> = server.get(endpoints::AUTOS).await.json();

        assert_eq!(autos.len(), 1);
    }
}
