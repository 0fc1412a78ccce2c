use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("missing required fields")]
    MissingFields,
    #[error("email is required")]
    MissingIdentity,
    #[error("no OTP found, please request a new one")]
    NoOtpFound,
    #[error("OTP expired, please request a new one")]
    OtpExpired,
    #[error("invalid OTP")]
    InvalidOtp,
    #[error("please wait {wait_secs}s before requesting another OTP")]
    TooSoon { wait_secs: u64 },
    #[error("too many resend attempts, try again later")]
    TooManyAttempts,
    #[error("failed to send OTP email")]
    DeliveryFailed(#[source] anyhow::Error),
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("please verify your email before logging in")]
    EmailNotVerified,
    #[error("invalid or revoked refresh token")]
    InvalidRefreshToken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::MissingIdentity => "MISSING_IDENTITY",
            Self::NoOtpFound => "NO_OTP_FOUND",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::TooSoon { .. } => "TOO_SOON",
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::DeliveryFailed(_) => "DELIVERY_FAILED",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingFields
            | Self::MissingIdentity
            | Self::NoOtpFound
            | Self::OtpExpired
            | Self::InvalidOtp => StatusCode::BAD_REQUEST,
            Self::TooSoon { .. } | Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            Self::DeliveryFailed(_) => StatusCode::BAD_GATEWAY,
            Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::EmailNotVerified => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and TraceLayer already records them.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::TooSoon { wait_secs } = self {
            body["wait_secs"] = wait_secs.into();
        }
        (status, axum::Json(body)).into_response()
    }
}
