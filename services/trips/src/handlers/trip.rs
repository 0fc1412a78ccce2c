use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rydroo_domain::pagination::PageRequest;

use crate::domain::types::Trip;
use crate::error::TripsServiceError;
use crate::state::AppState;
use crate::usecase::trip::{
    BookSeatsInput, BookSeatsUseCase, CancelTripUseCase, CreateTripInput, CreateTripUseCase,
    GetTripUseCase, ListTripsUseCase, Numeric, UpdateTripInput, UpdateTripUseCase,
};

/// Whole JSON numbers only; `2.5` and `"2"` are malformed.
fn seats_field(raw: Option<Value>) -> Option<Numeric<i64>> {
    raw.map(|v| v.as_i64().map_or(Numeric::Malformed, Numeric::Value))
}

/// JSON numbers or numeric strings.
fn price_field(raw: Option<Value>) -> Option<Numeric<Decimal>> {
    raw.map(|v| {
        let parsed: Option<Decimal> = match &v {
            Value::Number(n) => n.to_string().parse().ok(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.map_or(Numeric::Malformed, Numeric::Value)
    })
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TripResponse {
    pub id: String,
    pub source: String,
    pub destination: String,
    pub date: String,
    pub day: &'static str,
    pub time: String,
    pub available_seats: i32,
    pub price: Decimal,
    pub currency: &'static str,
    pub status: &'static str,
    #[serde(serialize_with = "rydroo_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "rydroo_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id.to_string(),
            source: trip.source,
            destination: trip.destination,
            date: trip.date.format("%Y-%m-%d").to_string(),
            day: trip.day.as_str(),
            time: trip.time,
            available_seats: trip.available_seats,
            price: trip.price,
            currency: trip.currency.as_str(),
            status: trip.status.as_str(),
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct TripListResponse {
    pub trips: Vec<TripResponse>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub trip_id: String,
    pub remaining_seats: i32,
}

// ── GET /trips ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct TripListQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

pub async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<TripListQuery>,
) -> Result<Json<TripListResponse>, TripsServiceError> {
    let usecase = ListTripsUseCase {
        repo: state.trip_repo(),
    };
    let trips = usecase
        .execute(PageRequest::from_query(query.limit, query.page))
        .await?;
    Ok(Json(TripListResponse {
        trips: trips.into_iter().map(TripResponse::from).collect(),
    }))
}

// ── GET /trips/{trip_id} ─────────────────────────────────────────────────────

pub async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripResponse>, TripsServiceError> {
    let usecase = GetTripUseCase {
        repo: state.trip_repo(),
    };
    let trip = usecase.execute(&trip_id).await?;
    Ok(Json(trip.into()))
}

// ── POST /trips ──────────────────────────────────────────────────────────────

/// Numeric fields are kept loose so that bad values surface as field errors.
#[derive(Deserialize)]
pub struct CreateTripRequest {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(alias = "availableSeats")]
    pub available_seats: Option<Value>,
    pub price: Option<Value>,
    pub currency: Option<String>,
}

pub async fn create_trip(
    State(state): State<AppState>,
    Json(body): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<TripResponse>), TripsServiceError> {
    let usecase = CreateTripUseCase {
        repo: state.trip_repo(),
    };
    let trip = usecase
        .execute(CreateTripInput {
            source: body.source,
            destination: body.destination,
            date: body.date,
            time: body.time,
            available_seats: seats_field(body.available_seats),
            price: price_field(body.price),
            currency: body.currency,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(trip.into())))
}

// ── PATCH /trips/{trip_id} ───────────────────────────────────────────────────

/// Unknown keys are ignored, which is how non-allow-listed fields get dropped.
#[derive(Deserialize)]
pub struct UpdateTripRequest {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(alias = "availableSeats")]
    pub available_seats: Option<Value>,
    pub price: Option<Value>,
    pub currency: Option<String>,
    pub status: Option<String>,
}

pub async fn update_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(body): Json<UpdateTripRequest>,
) -> Result<Json<TripResponse>, TripsServiceError> {
    let usecase = UpdateTripUseCase {
        repo: state.trip_repo(),
    };
    let trip = usecase
        .execute(
            &trip_id,
            UpdateTripInput {
                source: body.source,
                destination: body.destination,
                date: body.date,
                time: body.time,
                available_seats: seats_field(body.available_seats),
                price: price_field(body.price),
                currency: body.currency,
                status: body.status,
            },
        )
        .await?;
    Ok(Json(trip.into()))
}

// ── PATCH /trips/{trip_id}/cancel ────────────────────────────────────────────

pub async fn cancel_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripResponse>, TripsServiceError> {
    let usecase = CancelTripUseCase {
        repo: state.trip_repo(),
    };
    let trip = usecase.execute(&trip_id).await?;
    Ok(Json(trip.into()))
}

// ── PATCH /trips/{trip_id}/book ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BookSeatsRequest {
    /// Kept loose so that strings and fractions map to `InvalidSeatCount`.
    pub seats: Option<Value>,
}

pub async fn book_seats(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Json(body): Json<BookSeatsRequest>,
) -> Result<Json<BookingResponse>, TripsServiceError> {
    let usecase = BookSeatsUseCase {
        repo: state.trip_repo(),
    };
    let receipt = usecase
        .execute(
            &trip_id,
            BookSeatsInput {
                seats: body.seats.as_ref().and_then(Value::as_i64),
            },
        )
        .await?;
    Ok(Json(BookingResponse {
        trip_id: receipt.trip_id.to_string(),
        remaining_seats: receipt.remaining_seats,
    }))
}
