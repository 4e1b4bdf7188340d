//! HTTP handlers for the analytics reports and maintenance cost breakdowns.
//!
//! Every report accepts an optional `now` query parameter (RFC 3339). When it is
//! missing the current time is used. `now` is converted to the server's local
//! timezone before the reports pick their month windows.

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    report::{
        annual::{ReportRow, annual_report},
        chart::{ChartPoint, DEFAULT_CHART_MONTHS, income_expense_chart},
        dashboard::{DashboardStats, dashboard_stats},
        maintenance_costs::{
            AutoMaintenanceCost, MonthlyMaintenanceCost, maintenance_cost_per_auto,
            maintenance_cost_per_month,
        },
        payment_status::{PaymentStatus, rental_payment_status},
    },
    store::SQLiteFleetStore,
    timezone::local_date,
};

/// The state needed for computing reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The store the reports read fleet records from.
    pub store: SQLiteFleetStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SQLiteFleetStore::new(state.db_connection.clone()),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl ReportState {
    /// The local calendar date at `now`, or at the current time if `now` is `None`.
    fn today(&self, now: Option<OffsetDateTime>) -> Result<Date, Error> {
        local_date(
            &self.local_timezone,
            now.unwrap_or_else(OffsetDateTime::now_utc),
        )
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NowQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub now: Option<OffsetDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// How many months to show, defaults to [DEFAULT_CHART_MONTHS].
    pub months: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub now: Option<OffsetDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// The calendar year to report on, defaults to the current year.
    pub year: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub now: Option<OffsetDateTime>,
}

/// Fleet counts and the income, expense and profit of the current month.
pub async fn get_dashboard_stats(
    State(state): State<ReportState>,
    Query(query): Query<NowQuery>,
) -> Result<Json<DashboardStats>, Error> {
    let today = state.today(query.now)?;

    dashboard_stats(&state.store, today).await.map(Json)
}

/// Income and expense for each of the trailing months, oldest first.
pub async fn get_income_expense_chart(
    State(state): State<ReportState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Vec<ChartPoint>>, Error> {
    let months = match query.months {
        Some(months) => u32::try_from(months).map_err(|_| {
            Error::InvalidPeriod(format!("the number of months must be positive, got {months}"))
        })?,
        None => DEFAULT_CHART_MONTHS,
    };
    let today = state.today(query.now)?;

    income_expense_chart(&state.store, months, today)
        .await
        .map(Json)
}

/// Twelve rows of income, expense and profit for a calendar year.
pub async fn get_annual_report(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<ReportRow>>, Error> {
    let year = match query.year {
        Some(year) => year,
        None => state.today(query.now)?.year(),
    };

    annual_report(&state.store, year).await.map(Json)
}

/// The paid, pending and overdue amounts of one rental.
pub async fn get_payment_summary(
    State(state): State<ReportState>,
    Path(rental_id): Path<String>,
    Query(query): Query<NowQuery>,
) -> Result<Json<PaymentStatus>, Error> {
    let today = state.today(query.now)?;

    rental_payment_status(&state.store, &rental_id, today)
        .await
        .map(Json)
}

/// The total maintenance cost of each auto.
pub async fn get_maintenance_cost_per_auto(
    State(state): State<ReportState>,
) -> Result<Json<Vec<AutoMaintenanceCost>>, Error> {
    maintenance_cost_per_auto(&state.store).await.map(Json)
}

/// The total maintenance cost of each month with maintenance.
pub async fn get_maintenance_cost_per_month(
    State(state): State<ReportState>,
) -> Result<Json<Vec<MonthlyMaintenanceCost>>, Error> {
    maintenance_cost_per_month(&state.store).await.map(Json)
}
