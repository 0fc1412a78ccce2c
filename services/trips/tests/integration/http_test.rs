//! Routing and request validation. The database is disconnected, so only paths
//! that fail before touching the store are exercised here.

use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use rydroo_domain::id::TripId;
use rydroo_trips::router::build_router;
use rydroo_trips::state::AppState;

fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
    };
    TestServer::new(build_router(state)).unwrap()
}

fn assert_kind(body: Value, kind: &str) {
    assert_eq!(body["kind"], kind, "unexpected body: {body}");
}

#[tokio::test]
async fn should_answer_liveness_check() {
    let response = server().get("/healthz").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn should_report_unready_without_database() {
    let response = server().get("/readyz").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_echo_request_id() {
    let response = server().get("/healthz").await;
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn should_reject_malformed_trip_id() {
    let response = server().get("/trips/not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_kind(response.json(), "INVALID_IDENTIFIER");
}

#[tokio::test]
async fn should_reject_create_with_missing_fields() {
    let response = server()
        .post("/trips")
        .json(&json!({ "source": "Cairo", "destination": "Giza" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_kind(response.json(), "MISSING_FIELDS");
}

#[tokio::test]
async fn should_reject_create_with_zero_seats() {
    let response = server()
        .post("/trips")
        .json(&json!({
            "source": "Cairo",
            "destination": "Giza",
            "date": "2024-05-01",
            "time": "10:00",
            "availableSeats": 0,
            "price": 50
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_kind(response.json(), "INVALID_SEATS");
}

#[tokio::test]
async fn should_drop_unknown_update_keys() {
    let path = format!("/trips/{}", TripId::new());
    let response = server()
        .patch(&path)
        .json(&json!({ "driver": "someone", "id": "x" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_kind(response.json(), "NO_VALID_FIELDS");
}

#[tokio::test]
async fn should_reject_non_integer_seat_count() {
    let path = format!("/trips/{}/book", TripId::new());
    for seats in [json!("two"), json!(1.5), json!(0), Value::Null] {
        let response = server().patch(&path).json(&json!({ "seats": seats })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_kind(response.json(), "INVALID_SEAT_COUNT");
    }
}

fn cairo_giza_body() -> Value {
    json!({
        "source": "Cairo",
        "destination": "Giza",
        "date": "2024-05-01",
        "time": "10:00",
        "availableSeats": 4,
        "price": 50
    })
}

#[tokio::test]
async fn should_reject_fractional_seats_on_create() {
    let mut body = cairo_giza_body();
    body["availableSeats"] = json!(2.5);
    let response = server().post("/trips").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_kind(response.json(), "INVALID_SEATS");
}

#[tokio::test]
async fn should_reject_non_numeric_price_on_create() {
    let mut body = cairo_giza_body();
    body["price"] = json!("abc");
    let response = server().post("/trips").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_kind(response.json(), "INVALID_PRICE");
}

#[tokio::test]
async fn should_reject_malformed_numbers_on_update() {
    let path = format!("/trips/{}", TripId::new());

    let response = server()
        .patch(&path)
        .json(&json!({ "availableSeats": -1.5 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_kind(response.json(), "INVALID_SEATS");

    let response = server()
        .patch(&path)
        .json(&json!({ "price": { "amount": 10 } }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_kind(response.json(), "INVALID_PRICE");
}
