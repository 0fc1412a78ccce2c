use tracing::{info, warn};

use rydroo_auth_types::token::validate_access_token;
use rydroo_domain::id::UserId;

use crate::domain::repository::{Clock, SessionRepository, UserRepository};
use crate::error::AuthServiceError;
use crate::usecase::token::issue_token_pair;
use crate::usecase::user::LoginOutput;

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
    pub jwt_secret: String,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    /// Revokes the presented refresh token. Absent, expired or forged tokens
    /// revoke nothing; the caller clears cookies either way.
    pub async fn execute(&self, refresh_token: Option<&str>) -> Result<bool, AuthServiceError> {
        let Some(claims) =
            refresh_token.and_then(|token| validate_access_token(token, &self.jwt_secret).ok())
        else {
            return Ok(false);
        };
        let Some(token_id) = claims.token_id else {
            return Ok(false);
        };

        let revoked = self
            .sessions
            .revoke(token_id, UserId(claims.user_id))
            .await?;
        if revoked {
            info!(user_id = %claims.user_id, "session revoked");
        }
        Ok(revoked)
    }
}

// ── RefreshSession ───────────────────────────────────────────────────────────

pub struct RefreshSessionUseCase<U, S, C>
where
    U: UserRepository,
    S: SessionRepository,
    C: Clock,
{
    pub users: U,
    pub sessions: S,
    pub clock: C,
    pub jwt_secret: String,
}

impl<U, S, C> RefreshSessionUseCase<U, S, C>
where
    U: UserRepository,
    S: SessionRepository,
    C: Clock,
{
    /// Trades a stored refresh token for a new pair. The old token is consumed.
    pub async fn execute(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<LoginOutput, AuthServiceError> {
        let claims = refresh_token
            .and_then(|token| validate_access_token(token, &self.jwt_secret).ok())
            .ok_or(AuthServiceError::InvalidRefreshToken)?;
        let token_id = claims
            .token_id
            .ok_or(AuthServiceError::InvalidRefreshToken)?;
        let user_id = UserId(claims.user_id);

        if !self.sessions.revoke(token_id, user_id).await? {
            warn!(user_id = %user_id, "refresh token already used or revoked");
            return Err(AuthServiceError::InvalidRefreshToken);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::InvalidRefreshToken)?;

        let now = self.clock.now();
        let tokens = issue_token_pair(&user, &self.jwt_secret, now)?;
        self.sessions.store(&tokens.session(&user, now)).await?;
        info!(user_id = %user.id, "session refreshed");
        Ok(LoginOutput { user, tokens })
    }
}
