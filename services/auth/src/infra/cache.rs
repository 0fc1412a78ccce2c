use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use rydroo_domain::email::Email;

use crate::domain::repository::ResendMetaStore;
use crate::domain::types::{RESEND_WINDOW_SECS, ResendMeta};
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct RedisResendMetaStore {
    pub pool: Pool,
}

fn resend_key(email: &Email) -> String {
    format!("otp_resend:{}", email)
}

impl ResendMetaStore for RedisResendMetaStore {
    async fn get(&self, email: &Email) -> Result<Option<ResendMeta>, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let raw: Option<String> = conn
            .get(resend_key(email))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let meta = serde_json::from_str(&raw).context("decode resend metadata")?;
        Ok(Some(meta))
    }

    /// Every accepted send pushes the expiry out by a full window.
    async fn put(&self, email: &Email, meta: &ResendMeta) -> Result<(), AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let value = serde_json::to_string(meta).context("encode resend metadata")?;
        let (): () = conn
            .set_ex(resend_key(email), value, RESEND_WINDOW_SECS as u64)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;
        Ok(())
    }
}
