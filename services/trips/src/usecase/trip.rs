use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use rydroo_domain::id::TripId;
use rydroo_domain::pagination::PageRequest;
use rydroo_domain::trip::{Currency, TripStatus};

use crate::domain::repository::TripRepository;
use crate::domain::types::{BookingReceipt, NewTrip, Trip, TripPatch};
use crate::error::TripsServiceError;

fn parse_trip_id(raw: &str) -> Result<TripId, TripsServiceError> {
    raw.parse()
        .map_err(|_| TripsServiceError::InvalidIdentifier)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part in UTC).
fn parse_date(raw: &str) -> Result<NaiveDate, TripsServiceError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| TripsServiceError::InvalidDate)
}

fn parse_currency(raw: &str) -> Result<Currency, TripsServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| TripsServiceError::InvalidCurrency)
}

/// Trimmed, non-blank text or `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// A numeric request field that was present on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeric<T> {
    Value(T),
    /// Present but not a number of the expected kind (a fraction, a word).
    Malformed,
}

impl<T> From<T> for Numeric<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

// ── ListTrips ────────────────────────────────────────────────────────────────

pub struct ListTripsUseCase<R: TripRepository> {
    pub repo: R,
}

impl<R: TripRepository> ListTripsUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<Trip>, TripsServiceError> {
        self.repo.list_active(page).await
    }
}

// ── GetTrip ──────────────────────────────────────────────────────────────────

pub struct GetTripUseCase<R: TripRepository> {
    pub repo: R,
}

impl<R: TripRepository> GetTripUseCase<R> {
    pub async fn execute(&self, trip_id: &str) -> Result<Trip, TripsServiceError> {
        let id = parse_trip_id(trip_id)?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(TripsServiceError::TripNotFound)
    }
}

// ── CreateTrip ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct CreateTripInput {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub available_seats: Option<Numeric<i64>>,
    pub price: Option<Numeric<Decimal>>,
    pub currency: Option<String>,
}

pub struct CreateTripUseCase<R: TripRepository> {
    pub repo: R,
}

impl<R: TripRepository> CreateTripUseCase<R> {
    pub async fn execute(&self, input: CreateTripInput) -> Result<Trip, TripsServiceError> {
        let fields = validate_new_trip(input)?;

        if self
            .repo
            .exists_with_schedule(&fields.source, &fields.destination, fields.date, &fields.time)
            .await?
        {
            return Err(TripsServiceError::DuplicateTrip);
        }

        let trip = Trip::create(fields, Utc::now());
        // A racing creator that slipped past the check is caught by the unique index.
        self.repo.create(&trip).await?;

        info!(
            trip_id = %trip.id,
            source = %trip.source,
            destination = %trip.destination,
            date = %trip.date,
            seats = trip.available_seats,
            "trip created"
        );
        Ok(trip)
    }
}

fn validate_new_trip(input: CreateTripInput) -> Result<NewTrip, TripsServiceError> {
    let (
        Some(source),
        Some(destination),
        Some(date),
        Some(time),
        Some(available_seats),
        Some(price),
    ) = (
        non_blank(input.source),
        non_blank(input.destination),
        non_blank(input.date),
        non_blank(input.time),
        input.available_seats,
        input.price,
    )
    else {
        return Err(TripsServiceError::MissingFields);
    };

    let available_seats = match available_seats {
        Numeric::Value(n) if n > 0 => {
            i32::try_from(n).map_err(|_| TripsServiceError::InvalidSeats)?
        }
        _ => return Err(TripsServiceError::InvalidSeats),
    };

    let price = match price {
        Numeric::Value(p) if p > Decimal::ZERO => p,
        _ => return Err(TripsServiceError::InvalidPrice),
    };

    let date = parse_date(&date)?;
    let currency = match input.currency {
        Some(raw) => parse_currency(&raw)?,
        None => Currency::default(),
    };

    Ok(NewTrip {
        source,
        destination,
        date,
        time,
        available_seats,
        price,
        currency,
    })
}

// ── UpdateTrip ───────────────────────────────────────────────────────────────

/// Raw allow-listed fields of a partial update. Keys outside this set never reach here.
#[derive(Debug, Default)]
pub struct UpdateTripInput {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub available_seats: Option<Numeric<i64>>,
    pub price: Option<Numeric<Decimal>>,
    pub currency: Option<String>,
    pub status: Option<String>,
}

impl UpdateTripInput {
    fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.destination.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.available_seats.is_none()
            && self.price.is_none()
            && self.currency.is_none()
            && self.status.is_none()
    }
}

pub struct UpdateTripUseCase<R: TripRepository> {
    pub repo: R,
}

impl<R: TripRepository> UpdateTripUseCase<R> {
    pub async fn execute(
        &self,
        trip_id: &str,
        input: UpdateTripInput,
    ) -> Result<Trip, TripsServiceError> {
        let id = parse_trip_id(trip_id)?;
        let patch = validate_patch(input)?;

        let trip = self
            .repo
            .apply_patch(id, &patch, Utc::now())
            .await?
            .ok_or(TripsServiceError::TripNotFound)?;

        info!(trip_id = %trip.id, status = %trip.status, "trip updated");
        Ok(trip)
    }
}

fn validate_patch(input: UpdateTripInput) -> Result<TripPatch, TripsServiceError> {
    if input.is_empty() {
        return Err(TripsServiceError::NoValidFields);
    }

    let available_seats = match input.available_seats {
        Some(Numeric::Value(n)) if n >= 0 => {
            Some(i32::try_from(n).map_err(|_| TripsServiceError::InvalidSeats)?)
        }
        Some(_) => return Err(TripsServiceError::InvalidSeats),
        None => None,
    };

    let price = match input.price {
        Some(Numeric::Value(p)) if p > Decimal::ZERO => Some(p),
        Some(_) => return Err(TripsServiceError::InvalidPrice),
        None => None,
    };

    let text = |value: Option<String>| -> Result<Option<String>, TripsServiceError> {
        match value {
            Some(v) => non_blank(Some(v))
                .map(Some)
                .ok_or(TripsServiceError::MissingFields),
            None => Ok(None),
        }
    };

    Ok(TripPatch {
        source: text(input.source)?,
        destination: text(input.destination)?,
        date: input.date.as_deref().map(parse_date).transpose()?,
        time: text(input.time)?,
        available_seats,
        price,
        currency: input.currency.as_deref().map(parse_currency).transpose()?,
        status: input
            .status
            .as_deref()
            .map(|s| {
                s.trim()
                    .parse::<TripStatus>()
                    .map_err(|_| TripsServiceError::InvalidStatus)
            })
            .transpose()?,
    })
}

// ── CancelTrip ───────────────────────────────────────────────────────────────

pub struct CancelTripUseCase<R: TripRepository> {
    pub repo: R,
}

impl<R: TripRepository> CancelTripUseCase<R> {
    /// Cancels active and completed trips alike; only a second cancel is refused.
    pub async fn execute(&self, trip_id: &str) -> Result<Trip, TripsServiceError> {
        let id = parse_trip_id(trip_id)?;

        if let Some(trip) = self.repo.cancel(id, Utc::now()).await? {
            info!(trip_id = %trip.id, "trip cancelled");
            return Ok(trip);
        }

        match self.repo.find_by_id(id).await? {
            None => Err(TripsServiceError::TripNotFound),
            Some(_) => Err(TripsServiceError::AlreadyCancelled),
        }
    }
}

// ── BookSeats ────────────────────────────────────────────────────────────────

pub struct BookSeatsInput {
    /// `None` when the request carried no integer seat count.
    pub seats: Option<i64>,
}

pub struct BookSeatsUseCase<R: TripRepository> {
    pub repo: R,
}

impl<R: TripRepository> BookSeatsUseCase<R> {
    pub async fn execute(
        &self,
        trip_id: &str,
        input: BookSeatsInput,
    ) -> Result<BookingReceipt, TripsServiceError> {
        let id = parse_trip_id(trip_id)?;
        let seats = match input.seats {
            Some(n) if n > 0 => n,
            _ => return Err(TripsServiceError::InvalidSeatCount),
        };
        // More seats than any trip can hold.
        let seats = i32::try_from(seats).map_err(|_| TripsServiceError::BookingUnavailable)?;

        // Missing, inactive and sold-out trips are deliberately indistinguishable here.
        let trip = self
            .repo
            .decrement_seats(id, seats, Utc::now())
            .await?
            .ok_or(TripsServiceError::BookingUnavailable)?;

        info!(
            trip_id = %trip.id,
            seats,
            remaining = trip.available_seats,
            "seats booked"
        );

        // Not atomic with the decrement: a sold-out trip may briefly stay active.
        if trip.available_seats == 0 && self.repo.mark_completed(id, Utc::now()).await? {
            info!(trip_id = %trip.id, "trip sold out and completed");
        }

        Ok(BookingReceipt {
            trip_id: trip.id,
            remaining_seats: trip.available_seats,
        })
    }
}
