use axum::{
    Router,
    routing::{get, patch},
};

use rydroo_core::health::healthz;
use rydroo_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    health::readyz,
    trip::{book_seats, cancel_trip, create_trip, get_trip, list_trips, update_trip},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Trips
        .route("/trips", get(list_trips).post(create_trip))
        .route("/trips/{trip_id}", get(get_trip).patch(update_trip))
        .route("/trips/{trip_id}/cancel", patch(cancel_trip))
        .route("/trips/{trip_id}/book", patch(book_seats))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
