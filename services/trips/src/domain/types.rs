use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use rydroo_domain::id::TripId;
use rydroo_domain::trip::{Currency, TripStatus, Weekday, derive_weekday};

use crate::error::TripsServiceError;

/// A scheduled trip with a bookable seat counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: TripId,
    pub source: String,
    pub destination: String,
    pub date: NaiveDate,
    pub day: Weekday,
    pub time: String,
    pub available_seats: i32,
    pub price: Decimal,
    pub currency: Currency,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a new trip.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub source: String,
    pub destination: String,
    pub date: NaiveDate,
    pub time: String,
    pub available_seats: i32,
    pub price: Decimal,
    pub currency: Currency,
}

impl Trip {
    /// Build an active trip. `day` is derived here and nowhere else on creation.
    pub fn create(fields: NewTrip, now: DateTime<Utc>) -> Self {
        Self {
            id: TripId::new(),
            day: derive_weekday(fields.date),
            source: fields.source,
            destination: fields.destination,
            date: fields.date,
            time: fields.time,
            available_seats: fields.available_seats,
            price: fields.price,
            currency: fields.currency,
            status: TripStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an allow-listed partial update, keeping the lifecycle invariants.
    ///
    /// - a cancelled trip accepts no changes
    /// - `completed` always carries zero seats
    /// - giving a completed trip seats back reactivates it
    pub fn apply_patch(
        mut self,
        patch: &TripPatch,
        now: DateTime<Utc>,
    ) -> Result<Self, TripsServiceError> {
        if self.status == TripStatus::Cancelled {
            return Err(TripsServiceError::TripCancelled);
        }

        if let Some(ref source) = patch.source {
            self.source = source.clone();
        }
        if let Some(ref destination) = patch.destination {
            self.destination = destination.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
            self.day = derive_weekday(date);
        }
        if let Some(ref time) = patch.time {
            self.time = time.clone();
        }
        if let Some(seats) = patch.available_seats {
            self.available_seats = seats;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }

        match patch.status {
            Some(TripStatus::Completed) => {
                if patch.available_seats.is_some_and(|n| n > 0) {
                    return Err(TripsServiceError::InvalidSeats);
                }
                self.available_seats = 0;
                self.status = TripStatus::Completed;
            }
            Some(status) => self.status = status,
            None => {
                if self.status == TripStatus::Completed && self.available_seats > 0 {
                    self.status = TripStatus::Active;
                }
            }
        }

        self.updated_at = now;
        Ok(self)
    }
}

/// Allow-listed partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripPatch {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub available_seats: Option<i32>,
    pub price: Option<Decimal>,
    pub currency: Option<Currency>,
    pub status: Option<TripStatus>,
}

/// Outcome of a successful seat booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingReceipt {
    pub trip_id: TripId,
    pub remaining_seats: i32,
}
