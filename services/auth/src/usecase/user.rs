use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{debug, info, warn};

use rydroo_auth_types::token::validate_access_token;
use rydroo_domain::email::Email;

use crate::domain::repository::{
    Clock, OtpRepository, OtpSender, SessionRepository, UserRepository,
};
use crate::domain::types::User;
use crate::error::AuthServiceError;
use crate::usecase::otp::IssueOtpUseCase;
use crate::usecase::token::{TokenPair, issue_token_pair};

fn hash_password(password: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("hash password: {e}")))
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AuthServiceError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("stored password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn required(value: Option<String>) -> Result<String, AuthServiceError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(AuthServiceError::MissingFields)
}

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct SignupUseCase<U, O, S, C>
where
    U: UserRepository,
    O: OtpRepository,
    S: OtpSender,
    C: Clock,
{
    pub users: U,
    pub issuer: IssueOtpUseCase<O, S, C>,
    pub clock: C,
}

impl<U, O, S, C> SignupUseCase<U, O, S, C>
where
    U: UserRepository,
    O: OtpRepository,
    S: OtpSender,
    C: Clock,
{
    pub async fn execute(&self, input: SignupInput) -> Result<User, AuthServiceError> {
        let first_name = required(input.first_name)?;
        let last_name = required(input.last_name)?;
        let email = input
            .email
            .as_deref()
            .and_then(Email::parse)
            .ok_or(AuthServiceError::MissingFields)?;
        // Passwords are taken verbatim; only emptiness is rejected.
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AuthServiceError::MissingFields)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::UserAlreadyExists);
        }

        let now = self.clock.now();
        let user = User::register(
            first_name,
            last_name,
            email,
            hash_password(&password)?,
            now,
        );
        self.users.create(&user).await?;
        info!(user_id = %user.id, email = %user.email, "user registered");

        if let Err(e) = self.issuer.execute(&user.email).await {
            warn!(email = %user.email, error = %e, "signup otp dispatch failed");
        }
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    /// Access token cookie sent with the request, if any.
    pub session_token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub tokens: TokenPair,
}

#[derive(Debug)]
pub enum LoginOutcome {
    /// The request already carried a valid access token; nothing was issued.
    AlreadyLoggedIn,
    LoggedIn(LoginOutput),
}

pub struct LoginUseCase<U, S, C>
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

impl<U, S, C> LoginUseCase<U, S, C>
where
    U: UserRepository,
    S: SessionRepository,
    C: Clock,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutcome, AuthServiceError> {
        let live_session = input.session_token.as_deref().is_some_and(|token| {
            validate_access_token(token, &self.jwt_secret)
                .is_ok_and(|claims| claims.token_id.is_none())
        });
        if live_session {
            debug!("login skipped, access token still valid");
            return Ok(LoginOutcome::AlreadyLoggedIn);
        }

        let email = input
            .email
            .as_deref()
            .and_then(Email::parse)
            .ok_or(AuthServiceError::MissingFields)?;
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AuthServiceError::MissingFields)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        if !verify_password(&password, &user.password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }
        if !user.is_verified {
            return Err(AuthServiceError::EmailNotVerified);
        }

        let now = self.clock.now();
        let tokens = issue_token_pair(&user, &self.jwt_secret, now)?;
        self.sessions.store(&tokens.session(&user, now)).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome::LoggedIn(LoginOutput { user, tokens }))
    }
}
