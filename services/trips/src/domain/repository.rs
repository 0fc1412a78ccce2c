#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};

use rydroo_domain::id::TripId;
use rydroo_domain::pagination::PageRequest;

use crate::domain::types::{Trip, TripPatch};
use crate::error::TripsServiceError;

/// Durable store for trips.
///
/// Every mutation is a single conditional statement (or a locked transaction for
/// patches); callers never read-then-write.
pub trait TripRepository: Send + Sync {
    /// Active trips ordered by (date, time, id).
    async fn list_active(&self, page: PageRequest) -> Result<Vec<Trip>, TripsServiceError>;

    async fn find_by_id(&self, id: TripId) -> Result<Option<Trip>, TripsServiceError>;

    /// Whether a trip already runs on this route at this date and time.
    async fn exists_with_schedule(
        &self,
        source: &str,
        destination: &str,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, TripsServiceError>;

    /// Insert a trip. Fails with `DuplicateTrip` if the schedule is already taken.
    async fn create(&self, trip: &Trip) -> Result<(), TripsServiceError>;

    /// Lock the row, apply `patch` via [`Trip::apply_patch`] and persist the result.
    /// Returns `None` if the trip does not exist.
    async fn apply_patch(
        &self,
        id: TripId,
        patch: &TripPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError>;

    /// Set status to cancelled where it is not already cancelled.
    /// Returns `None` if no row matched.
    async fn cancel(
        &self,
        id: TripId,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError>;

    /// Decrement seats where the trip is active and has at least `seats` left.
    /// Returns the updated trip, or `None` if the predicate did not match.
    async fn decrement_seats(
        &self,
        id: TripId,
        seats: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError>;

    /// Move an active trip with zero seats to completed.
    /// Returns `true` if this call made the transition.
    async fn mark_completed(
        &self,
        id: TripId,
        now: DateTime<Utc>,
    ) -> Result<bool, TripsServiceError>;
}
