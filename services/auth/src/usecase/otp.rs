use rand::RngExt;
use tracing::{debug, info, warn};

use rydroo_domain::email::Email;

use crate::domain::repository::{
    Clock, OtpRepository, OtpSender, ResendMetaStore, UserRepository,
};
use crate::domain::types::{Otp, ResendMeta};
use crate::error::AuthServiceError;

fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

// ── IssueOtp ─────────────────────────────────────────────────────────────────

/// Stores a new code for an identity (dropping earlier ones) and dispatches it.
/// Signup and resend both issue through this.
pub struct IssueOtpUseCase<O, S, C>
where
    O: OtpRepository,
    S: OtpSender,
    C: Clock,
{
    pub otps: O,
    pub sender: S,
    pub clock: C,
}

impl<O, S, C> IssueOtpUseCase<O, S, C>
where
    O: OtpRepository,
    S: OtpSender,
    C: Clock,
{
    /// The record is kept when dispatch fails, so a code that arrives late
    /// still verifies.
    pub async fn execute(&self, email: &Email) -> Result<(), AuthServiceError> {
        let otp = Otp::issue(email.clone(), generate_code(), self.clock.now());
        self.otps.replace(&otp).await?;
        self.sender.send(email, &otp.code).await?;
        info!(email = %email, otp_id = %otp.id, "otp issued");
        Ok(())
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub email: Option<String>,
    pub code: Option<String>,
}

pub struct VerifyOtpUseCase<O, U, C>
where
    O: OtpRepository,
    U: UserRepository,
    C: Clock,
{
    pub otps: O,
    pub users: U,
    pub clock: C,
}

impl<O, U, C> VerifyOtpUseCase<O, U, C>
where
    O: OtpRepository,
    U: UserRepository,
    C: Clock,
{
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<(), AuthServiceError> {
        let email = input
            .email
            .as_deref()
            .and_then(Email::parse)
            .ok_or(AuthServiceError::MissingFields)?;
        let code = input
            .code
            .filter(|c| !c.trim().is_empty())
            .ok_or(AuthServiceError::MissingFields)?;

        let otp = self
            .otps
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::NoOtpFound)?;

        let now = self.clock.now();
        if otp.is_expired(now) {
            self.otps.delete_by_id(otp.id).await?;
            return Err(AuthServiceError::OtpExpired);
        }

        if otp.code != code {
            return Err(AuthServiceError::InvalidOtp);
        }

        // A concurrent verifier may have consumed it first.
        if !self.otps.delete_by_id(otp.id).await? {
            return Err(AuthServiceError::NoOtpFound);
        }

        if self.users.mark_verified(&email, now).await? {
            info!(email = %email, "email verified");
        } else {
            debug!(email = %email, "otp verified for unknown account");
        }
        Ok(())
    }
}

// ── ResendOtp ────────────────────────────────────────────────────────────────

pub struct ResendOtpUseCase<U, O, S, M, C>
where
    U: UserRepository,
    O: OtpRepository,
    S: OtpSender,
    M: ResendMetaStore,
    C: Clock,
{
    pub users: U,
    pub issuer: IssueOtpUseCase<O, S, C>,
    pub meta: M,
    pub clock: C,
    pub max_per_window: u32,
}

impl<U, O, S, M, C> ResendOtpUseCase<U, O, S, M, C>
where
    U: UserRepository,
    O: OtpRepository,
    S: OtpSender,
    M: ResendMetaStore,
    C: Clock,
{
    /// Succeeds identically whether or not an account exists for `email`.
    pub async fn execute(&self, email: Option<String>) -> Result<(), AuthServiceError> {
        let email = email
            .as_deref()
            .and_then(Email::parse)
            .ok_or(AuthServiceError::MissingIdentity)?;

        let now = self.clock.now();
        let mut meta = self
            .meta
            .get(&email)
            .await?
            .unwrap_or_else(|| ResendMeta::fresh(now))
            .admit(now, self.max_per_window)?;

        // Past the rate limit the response is always success.
        match self.users.find_by_email(&email).await {
            Ok(Some(_)) => {
                if let Err(e) = self.issuer.execute(&email).await {
                    warn!(email = %email, error = %e, "otp resend failed");
                }
            }
            Ok(None) => debug!(email = %email, "resend requested for unknown account"),
            Err(e) => warn!(email = %email, error = %e, "resend account lookup failed"),
        }

        meta.record_send(now);
        self.meta.put(&email, &meta).await?;
        Ok(())
    }
}
