use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use rydroo_auth_types::cookie::{ACCESS_TOKEN_EXP, REFRESH_TOKEN_EXP};
use rydroo_auth_types::token::JwtClaims;

use crate::domain::types::{RefreshSession, User};
use crate::error::AuthServiceError;

/// Access and refresh tokens issued on login or refresh.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
    pub refresh_token_id: Uuid,
    pub refresh_token_exp: u64,
}

impl TokenPair {
    /// Server-side record of the refresh token.
    pub fn session(&self, user: &User, now: DateTime<Utc>) -> RefreshSession {
        let expires_at = i64::try_from(self.refresh_token_exp)
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or(now);
        RefreshSession {
            id: self.refresh_token_id,
            user_id: user.id,
            expires_at,
            created_at: now,
        }
    }
}

fn sign(
    user: &User,
    exp: u64,
    jti: Option<Uuid>,
    secret: &str,
) -> Result<String, AuthServiceError> {
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.role,
        exp,
        jti: jti.map(|id| id.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

pub fn issue_token_pair(
    user: &User,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<TokenPair, AuthServiceError> {
    let now_secs = u64::try_from(now.timestamp()).unwrap_or(0);
    let access_token_exp = now_secs + ACCESS_TOKEN_EXP;
    let refresh_token_exp = now_secs + REFRESH_TOKEN_EXP;
    let refresh_token_id = Uuid::now_v7();
    Ok(TokenPair {
        access_token: sign(user, access_token_exp, None, secret)?,
        access_token_exp,
        refresh_token: sign(user, refresh_token_exp, Some(refresh_token_id), secret)?,
        refresh_token_id,
        refresh_token_exp,
    })
}
