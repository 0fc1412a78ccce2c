use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::otp::{IssueOtpUseCase, ResendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

/// Returned for every accepted resend, registered or not.
pub const RESEND_ACCEPTED_MESSAGE: &str = "If an account exists, an OTP has been sent.";

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /otp/verify ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    #[serde(alias = "code")]
    pub otp: Option<String>,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = VerifyOtpUseCase {
        otps: state.otp_repo(),
        users: state.user_repo(),
        clock: state.clock(),
    };
    usecase
        .execute(VerifyOtpInput {
            email: body.email,
            code: body.otp,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "OTP verified successfully",
    }))
}

// ── POST /otp/resend ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResendOtpRequest {
    pub email: Option<String>,
}

pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<ResendOtpRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let usecase = ResendOtpUseCase {
        users: state.user_repo(),
        issuer: IssueOtpUseCase {
            otps: state.otp_repo(),
            sender: state.otp_sender(),
            clock: state.clock(),
        },
        meta: state.resend_meta_store(),
        clock: state.clock(),
        max_per_window: state.otp_resend_max_per_window,
    };
    usecase.execute(body.email).await?;
    Ok(Json(MessageResponse {
        message: RESEND_ACCEPTED_MESSAGE,
    }))
}
