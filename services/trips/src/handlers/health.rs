use axum::{extract::State, http::StatusCode};

use rydroo_core::health::database_readiness;

use crate::state::AppState;

/// `GET /readyz`: ready once PostgreSQL answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    database_readiness(&state.db).await
}
