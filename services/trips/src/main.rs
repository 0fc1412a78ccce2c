use sea_orm::Database;
use tracing::info;

use rydroo_core::tracing::init_tracing;
use rydroo_trips::config::TripsConfig;
use rydroo_trips::router::build_router;
use rydroo_trips::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = TripsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let router = build_router(AppState { db });
    let addr = format!("0.0.0.0:{}", config.trips_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("trips service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
