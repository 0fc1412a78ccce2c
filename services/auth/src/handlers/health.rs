use axum::{extract::State, http::StatusCode};
use deadpool_redis::Pool as RedisPool;

use rydroo_core::health::database_readiness;

use crate::state::AppState;

async fn redis_ping(pool: &RedisPool) -> anyhow::Result<()> {
    let mut conn = pool.get().await?;
    let _: String = deadpool_redis::redis::cmd("PING")
        .query_async(&mut conn)
        .await?;
    Ok(())
}

/// `GET /readyz`: ready once both PostgreSQL and Redis answer.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let db = database_readiness(&state.db).await;
    if db != StatusCode::OK {
        return db;
    }
    match redis_ping(&state.redis).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "redis ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
