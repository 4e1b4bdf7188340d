//! An in-memory [FleetStore] for testing the reports without a database.

use std::ops::Range;

use time::Date;

use crate::{
    Error,
    maintenance::MaintenanceRecord,
    payment::Payment,
    rental::Rental,
    store::{CountQuery, FleetStore, PaymentFilter},
};

#[derive(Debug, Default, Clone)]
pub(crate) struct MemoryStore {
    pub autos: u64,
    pub drivers: u64,
    pub rentals: Vec<Rental>,
    pub payments: Vec<Payment>,
    pub maintenance: Vec<MaintenanceRecord>,
    /// Date range reads starting on this day fail with [Error::StoreUnavailable].
    pub failing_month: Option<Date>,
}

impl MemoryStore {
    fn check_available(&self, date_range: &Range<Date>) -> Result<(), Error> {
        if self.failing_month == Some(date_range.start) {
            return Err(Error::StoreUnavailable(format!(
                "no answer for {}",
                date_range.start
            )));
        }

        Ok(())
    }
}

impl FleetStore for MemoryStore {
    async fn count(&self, query: CountQuery) -> Result<u64, Error> {
        Ok(match query {
            CountQuery::Autos => self.autos,
            CountQuery::Drivers => self.drivers,
            CountQuery::Rentals(status) => self
                .rentals
                .iter()
                .filter(|rental| rental.status == status)
                .count() as u64,
        })
    }

    async fn list_payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>, Error> {
        match filter {
            PaymentFilter::DateRange(date_range) => {
                self.check_available(&date_range)?;

                Ok(self
                    .payments
                    .iter()
                    .filter(|payment| date_range.contains(&payment.date))
                    .cloned()
                    .collect())
            }
            PaymentFilter::Rental(rental_id) => Ok(self
                .payments
                .iter()
                .filter(|payment| payment.rental_id == rental_id)
                .cloned()
                .collect()),
        }
    }

    async fn list_maintenance(
        &self,
        date_range: Option<Range<Date>>,
    ) -> Result<Vec<MaintenanceRecord>, Error> {
        match date_range {
            Some(date_range) => {
                self.check_available(&date_range)?;

                Ok(self
                    .maintenance
                    .iter()
                    .filter(|record| date_range.contains(&record.date))
                    .cloned()
                    .collect())
            }
            None => Ok(self.maintenance.clone()),
        }
    }

    async fn get_rental(&self, rental_id: &str) -> Result<Rental, Error> {
        self.rentals
            .iter()
            .find(|rental| rental.rental_id == rental_id)
            .cloned()
            .ok_or(Error::NotFound)
    }
}
