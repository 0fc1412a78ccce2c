#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use rydroo_domain::email::Email;
use rydroo_domain::id::UserId;

use crate::domain::types::{Otp, RefreshSession, ResendMeta, User};
use crate::error::AuthServiceError;

/// Repository for registered accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthServiceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError>;

    /// Insert a user. Fails with `UserAlreadyExists` if the email is taken.
    async fn create(&self, user: &User) -> Result<(), AuthServiceError>;

    /// Set `is_verified`. Returns `false` when no account has this email.
    async fn mark_verified(
        &self,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError>;
}

/// Repository for one-time verification codes.
pub trait OtpRepository: Send + Sync {
    /// Delete every code for `otp.email` and insert `otp`, atomically.
    async fn replace(&self, otp: &Otp) -> Result<(), AuthServiceError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Otp>, AuthServiceError>;

    /// Returns `true` if this call removed the record.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AuthServiceError>;
}

/// Issued refresh tokens, one row per logged-in device.
pub trait SessionRepository: Send + Sync {
    /// Record a newly issued refresh token. Expired sessions of the same user
    /// may be pruned along the way.
    async fn store(&self, session: &RefreshSession) -> Result<(), AuthServiceError>;

    /// Delete the session if it belongs to `user_id`. Returns `true` if this
    /// call removed it, so a token can be consumed at most once.
    async fn revoke(&self, id: Uuid, user_id: UserId) -> Result<bool, AuthServiceError>;
}

/// Resend rate-limit state, keyed by identity (Redis, one-hour TTL).
pub trait ResendMetaStore: Send + Sync {
    async fn get(&self, email: &Email) -> Result<Option<ResendMeta>, AuthServiceError>;

    async fn put(&self, email: &Email, meta: &ResendMeta) -> Result<(), AuthServiceError>;
}

/// Outbound delivery of a code to its owner.
pub trait OtpSender: Send + Sync {
    /// Fails with `DeliveryFailed` on transport errors or a rejected send.
    async fn send(&self, email: &Email, code: &str) -> Result<(), AuthServiceError>;
}

/// Source of the current time, injected so that expiry and cooldowns are testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
