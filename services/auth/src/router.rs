use axum::{
    Router,
    routing::{get, post},
};

use rydroo_core::health::healthz;
use rydroo_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    health::readyz,
    otp::{resend_otp, verify_otp},
    user::{login, logout, refresh, signup},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Accounts
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .route("/users/refresh", post(refresh))
        .route("/users/logout", post(logout))
        // Email verification
        .route("/otp/verify", post(verify_otp))
        .route("/otp/resend", post(resend_otp))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
