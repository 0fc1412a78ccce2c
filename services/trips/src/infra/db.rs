use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::Expr,
};

use rydroo_domain::id::TripId;
use rydroo_domain::pagination::PageRequest;
use rydroo_domain::trip::{Currency, TripStatus, Weekday};
use rydroo_trips_schema::trips;

use crate::domain::repository::TripRepository;
use crate::domain::types::{Trip, TripPatch};
use crate::error::TripsServiceError;

// ── Trip repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTripRepository {
    pub db: DatabaseConnection,
}

impl TripRepository for DbTripRepository {
    async fn list_active(&self, page: PageRequest) -> Result<Vec<Trip>, TripsServiceError> {
        let page = page.clamped();
        let models = trips::Entity::find()
            .filter(trips::Column::Status.eq(TripStatus::Active.as_str()))
            .order_by_asc(trips::Column::Date)
            .order_by_asc(trips::Column::Time)
            .order_by_asc(trips::Column::Id)
            .limit(u64::from(page.limit))
            .offset(page.offset())
            .all(&self.db)
            .await
            .context("list active trips")?;
        models.into_iter().map(trip_from_model).collect()
    }

    async fn find_by_id(&self, id: TripId) -> Result<Option<Trip>, TripsServiceError> {
        let model = trips::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find trip by id")?;
        model.map(trip_from_model).transpose()
    }

    async fn exists_with_schedule(
        &self,
        source: &str,
        destination: &str,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, TripsServiceError> {
        let count = trips::Entity::find()
            .filter(trips::Column::Source.eq(source))
            .filter(trips::Column::Destination.eq(destination))
            .filter(trips::Column::Date.eq(date))
            .filter(trips::Column::Time.eq(time))
            .count(&self.db)
            .await
            .context("check duplicate trip schedule")?;
        Ok(count > 0)
    }

    async fn create(&self, trip: &Trip) -> Result<(), TripsServiceError> {
        trip_to_active_model(trip)
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "create trip"))?;
        Ok(())
    }

    async fn apply_patch(
        &self,
        id: TripId,
        patch: &TripPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError> {
        let txn = self.db.begin().await.context("begin trip patch")?;

        let Some(model) = trips::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .context("lock trip for patch")?
        else {
            return Ok(None);
        };

        let updated = trip_from_model(model)?.apply_patch(patch, now)?;
        trip_to_active_model(&updated)
            .update(&txn)
            .await
            .map_err(|e| map_write_err(e, "update trip"))?;

        txn.commit().await.context("commit trip patch")?;
        Ok(Some(updated))
    }

    async fn cancel(
        &self,
        id: TripId,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError> {
        let models = trips::Entity::update_many()
            .col_expr(
                trips::Column::Status,
                Expr::value(TripStatus::Cancelled.as_str()),
            )
            .col_expr(trips::Column::UpdatedAt, Expr::value(now))
            .filter(trips::Column::Id.eq(id.0))
            .filter(trips::Column::Status.ne(TripStatus::Cancelled.as_str()))
            .exec_with_returning(&self.db)
            .await
            .context("cancel trip")?;
        models.into_iter().next().map(trip_from_model).transpose()
    }

    async fn decrement_seats(
        &self,
        id: TripId,
        seats: i32,
        now: DateTime<Utc>,
    ) -> Result<Option<Trip>, TripsServiceError> {
        // Single check-and-decrement statement; concurrent bookers serialize on the row.
        let models = trips::Entity::update_many()
            .col_expr(
                trips::Column::AvailableSeats,
                Expr::col(trips::Column::AvailableSeats).sub(seats),
            )
            .col_expr(trips::Column::UpdatedAt, Expr::value(now))
            .filter(trips::Column::Id.eq(id.0))
            .filter(trips::Column::Status.eq(TripStatus::Active.as_str()))
            .filter(trips::Column::AvailableSeats.gte(seats))
            .exec_with_returning(&self.db)
            .await
            .context("book trip seats")?;
        models.into_iter().next().map(trip_from_model).transpose()
    }

    async fn mark_completed(
        &self,
        id: TripId,
        now: DateTime<Utc>,
    ) -> Result<bool, TripsServiceError> {
        let result = trips::Entity::update_many()
            .col_expr(
                trips::Column::Status,
                Expr::value(TripStatus::Completed.as_str()),
            )
            .col_expr(trips::Column::UpdatedAt, Expr::value(now))
            .filter(trips::Column::Id.eq(id.0))
            .filter(trips::Column::Status.eq(TripStatus::Active.as_str()))
            .filter(trips::Column::AvailableSeats.eq(0))
            .exec(&self.db)
            .await
            .context("complete sold-out trip")?;
        Ok(result.rows_affected > 0)
    }
}

/// Unique-index violations surface as `DuplicateTrip`; everything else is internal.
fn map_write_err(err: DbErr, what: &'static str) -> TripsServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return TripsServiceError::DuplicateTrip;
    }
    TripsServiceError::Internal(anyhow::Error::new(err).context(what))
}

fn trip_to_active_model(trip: &Trip) -> trips::ActiveModel {
    trips::ActiveModel {
        id: Set(trip.id.0),
        source: Set(trip.source.clone()),
        destination: Set(trip.destination.clone()),
        date: Set(trip.date),
        day: Set(trip.day.as_str().to_owned()),
        time: Set(trip.time.clone()),
        available_seats: Set(trip.available_seats),
        price: Set(trip.price),
        currency: Set(trip.currency.as_str().to_owned()),
        status: Set(trip.status.as_str().to_owned()),
        created_at: Set(trip.created_at),
        updated_at: Set(trip.updated_at),
    }
}

fn trip_from_model(model: trips::Model) -> Result<Trip, TripsServiceError> {
    Ok(Trip {
        id: TripId(model.id),
        day: model.day.parse::<Weekday>().context("decode trip day")?,
        currency: model.currency.parse::<Currency>().context("decode trip currency")?,
        status: model.status.parse::<TripStatus>().context("decode trip status")?,
        source: model.source,
        destination: model.destination,
        date: model.date,
        time: model.time,
        available_seats: model.available_seats,
        price: model.price,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
