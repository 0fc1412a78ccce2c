use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rydroo_domain::email::Email;
use rydroo_domain::id::UserId;

use crate::error::AuthServiceError;

/// OTP lifetime in seconds.
pub const OTP_TTL_SECS: i64 = 300;

/// Minimum gap between two accepted resends for one identity.
pub const RESEND_COOLDOWN_SECS: i64 = 60;

/// Length of the rolling resend window. Also the Redis TTL of the metadata key.
pub const RESEND_WINDOW_SECS: i64 = 3600;

/// Accepted resends per window unless overridden by configuration.
pub const DEFAULT_RESEND_MAX_PER_WINDOW: u32 = 5;

/// Role assigned to self-registered accounts.
pub const DEFAULT_USER_ROLE: u8 = 0;

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    /// PHC-format argon2 hash.
    pub password_hash: String,
    pub is_verified: bool,
    pub role: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fresh, unverified account.
    pub fn register(
        first_name: String,
        last_name: String,
        email: Email,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            first_name,
            last_name,
            email,
            password_hash,
            is_verified: false,
            role: DEFAULT_USER_ROLE,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A refresh token handed to one device. Logout deletes it; a refresh consumes
/// it and stores its replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSession {
    /// The token's `jti`.
    pub id: Uuid,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One-time email verification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Otp {
    pub id: Uuid,
    pub email: Email,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Otp {
    pub fn issue(email: Email, code: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            email,
            code,
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Per-identity resend bookkeeping, stored as JSON in Redis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendMeta {
    /// `None` until the first accepted resend.
    pub last_sent_at: Option<DateTime<Utc>>,
    /// Accepted resends in the current window.
    pub count: u32,
    pub window_start: DateTime<Utc>,
}

impl ResendMeta {
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            last_sent_at: None,
            count: 0,
            window_start: now,
        }
    }

    /// Apply the cooldown, then the window reset, then the cap.
    ///
    /// Returns the metadata to persist once the send is recorded.
    pub fn admit(
        mut self,
        now: DateTime<Utc>,
        max_per_window: u32,
    ) -> Result<Self, AuthServiceError> {
        if let Some(last) = self.last_sent_at {
            let cooldown = Duration::seconds(RESEND_COOLDOWN_SECS);
            let elapsed = now - last;
            if elapsed < cooldown {
                let remaining_ms = (cooldown - elapsed).num_milliseconds();
                let wait_secs = u64::try_from(remaining_ms)
                    .unwrap_or(0)
                    .div_ceil(1000)
                    .max(1);
                return Err(AuthServiceError::TooSoon { wait_secs });
            }
        }

        if now - self.window_start > Duration::seconds(RESEND_WINDOW_SECS) {
            self.count = 0;
            self.window_start = now;
        }

        if self.count >= max_per_window {
            return Err(AuthServiceError::TooManyAttempts);
        }
        Ok(self)
    }

    pub fn record_send(&mut self, now: DateTime<Utc>) {
        self.last_sent_at = Some(now);
        self.count += 1;
    }
}
