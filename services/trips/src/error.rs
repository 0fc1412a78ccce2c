use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Trips service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum TripsServiceError {
    #[error("trip not found")]
    TripNotFound,
    #[error("invalid trip id format")]
    InvalidIdentifier,
    #[error("all trip fields are required")]
    MissingFields,
    #[error("invalid available seats")]
    InvalidSeats,
    #[error("trip price must be greater than zero")]
    InvalidPrice,
    #[error("invalid trip date")]
    InvalidDate,
    #[error("invalid trip status")]
    InvalidStatus,
    #[error("unsupported currency")]
    InvalidCurrency,
    #[error("no valid fields provided for update")]
    NoValidFields,
    #[error("trip already exists at the same time and date")]
    DuplicateTrip,
    #[error("trip is already cancelled")]
    AlreadyCancelled,
    #[error("trip is cancelled")]
    TripCancelled,
    #[error("seats must be a number greater than zero")]
    InvalidSeatCount,
    #[error("trip not found, cancelled, or not enough available seats")]
    BookingUnavailable,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl TripsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TripNotFound => "TRIP_NOT_FOUND",
            Self::InvalidIdentifier => "INVALID_IDENTIFIER",
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidSeats => "INVALID_SEATS",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidCurrency => "INVALID_CURRENCY",
            Self::NoValidFields => "NO_VALID_FIELDS",
            Self::DuplicateTrip => "DUPLICATE_TRIP",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::TripCancelled => "TRIP_CANCELLED",
            Self::InvalidSeatCount => "INVALID_SEAT_COUNT",
            Self::BookingUnavailable => "BOOKING_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for TripsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::TripNotFound => StatusCode::NOT_FOUND,
            Self::InvalidIdentifier
            | Self::MissingFields
            | Self::InvalidSeats
            | Self::InvalidPrice
            | Self::InvalidDate
            | Self::InvalidStatus
            | Self::InvalidCurrency
            | Self::NoValidFields
            | Self::AlreadyCancelled
            | Self::InvalidSeatCount
            | Self::BookingUnavailable => StatusCode::BAD_REQUEST,
            Self::DuplicateTrip | Self::TripCancelled => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
