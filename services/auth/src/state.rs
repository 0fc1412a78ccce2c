use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::domain::repository::SystemClock;
use crate::infra::cache::RedisResendMetaStore;
use crate::infra::db::{DbOtpRepository, DbSessionRepository, DbUserRepository};
use crate::infra::mailer::BrevoOtpSender;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub mailer: BrevoOtpSender,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub otp_resend_max_per_window: u32,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_repo(&self) -> DbOtpRepository {
        DbOtpRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn resend_meta_store(&self) -> RedisResendMetaStore {
        RedisResendMetaStore {
            pool: self.redis.clone(),
        }
    }

    pub fn otp_sender(&self) -> BrevoOtpSender {
        self.mailer.clone()
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}
