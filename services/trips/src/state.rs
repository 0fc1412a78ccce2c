use sea_orm::DatabaseConnection;

use crate::infra::db::DbTripRepository;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn trip_repo(&self) -> DbTripRepository {
        DbTripRepository {
            db: self.db.clone(),
        }
    }
}
