use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use rydroo_domain::id::TripId;
use rydroo_domain::pagination::PageRequest;
use rydroo_domain::trip::{Currency, TripStatus};
use rydroo_trips::domain::repository::TripRepository;
use rydroo_trips::domain::types::{NewTrip, Trip, TripPatch};
use rydroo_trips::error::TripsServiceError;

// ── MockTripRepo ─────────────────────────────────────────────────────────────

/// In-memory trip store. Every conditional operation runs under one lock
/// acquisition, standing in for the database's single-statement updates.
#[derive(Clone, Default)]
pub struct MockTripRepo {
    pub trips: Arc<Mutex<Vec<Trip>>>,
}

impl MockTripRepo {
    pub fn new(trips: Vec<Trip>) -> Self {
        Self {
            trips: Arc::new(Mutex::new(trips)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a shared handle to the internal trip list for post-execution inspection.
    pub fn trips_handle(&self) -> Arc<Mutex<Vec<Trip>>> {
        Arc::clone(&self.trips)
    }

    pub fn get(&self, id: TripId) -> Option<Trip> {
        self.trips.lock().unwrap().iter().find(|t| t.id == id).cloned()
    }
}

impl TripRepository for MockTripRepo {
    async fn list_active(&self, page: PageRequest) -> Result<Vec<Trip>, TripsServiceError> {
        let page = page.clamped();
        let mut active: Vec<Trip> = self
            .trips
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.status == TripStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            (a.date, &a.time, a.id.0).cmp(&(b.date, &b.time, b.id.0))
        });
        Ok(active
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: TripId) -> Result<Option<Trip>, TripsServiceError> {
        Ok(self.get(id))
    }

    async fn exists_with_schedule(
        &self,
        source: &str,
        destination: &str,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, TripsServiceError> {
        Ok(self.trips.lock().unwrap().iter().any(|t| {
            t.source == source && t.destination == destination && t.date == date && t.time == time
        }))
    }

    async fn create(&self, trip: &Trip) -> Result<(), TripsServiceError> {
        let mut trips = self.trips.lock().unwrap();
        if trips.iter().any(|t| {
            t.source == trip.source
                && t.destination == trip.destination
                && t.date == trip.date
                && t.time == trip.time
        }) {
            return Err(TripsServiceError::DuplicateTrip);
        }
        trips.push(trip.clone());
        Ok(())
    }

    async fn apply_patch(
        &self,
        id: TripId,
        patch: &TripPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError> {
        let mut trips = self.trips.lock().unwrap();
        let Some(slot) = trips.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        let updated = slot.clone().apply_patch(patch, now)?;
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn cancel(
        &self,
        id: TripId,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError> {
        let mut trips = self.trips.lock().unwrap();
        Ok(trips
            .iter_mut()
            .find(|t| t.id == id && t.status != TripStatus::Cancelled)
            .map(|t| {
                t.status = TripStatus::Cancelled;
                t.updated_at = now;
                t.clone()
            }))
    }

    async fn decrement_seats(
        &self,
        id: TripId,
        seats: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError> {
        let mut trips = self.trips.lock().unwrap();
        Ok(trips
            .iter_mut()
            .find(|t| t.id == id && t.status == TripStatus::Active && t.available_seats >= seats)
            .map(|t| {
                t.available_seats -= seats;
                t.updated_at = now;
                t.clone()
            }))
    }

    async fn mark_completed(
        &self,
        id: TripId,
        now: DateTime<Utc>,
    ) -> Result<bool, TripsServiceError> {
        let mut trips = self.trips.lock().unwrap();
        match trips
            .iter_mut()
            .find(|t| t.id == id && t.status == TripStatus::Active && t.available_seats == 0)
        {
            Some(t) => {
                t.status = TripStatus::Completed;
                t.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_trip(seats: i32) -> Trip {
    Trip::create(
        NewTrip {
            source: "Cairo".into(),
            destination: "Giza".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: "10:00".into(),
            available_seats: seats,
            price: Decimal::new(50, 0),
            currency: Currency::Egp,
        },
        Utc::now(),
    )
}

pub fn trip_at(date: NaiveDate, time: &str) -> Trip {
    let mut trip = test_trip(4);
    trip.date = date;
    trip.time = time.to_owned();
    trip
}
