/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL. Holds per-identity resend metadata.
    pub redis_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "rydroo.com").
    pub cookie_domain: String,
    /// Brevo transactional email API key.
    pub brevo_api_key: String,
    /// Brevo send endpoint. Env var: `BREVO_API_URL`.
    pub brevo_api_url: String,
    /// Sender address for verification emails.
    pub support_email: String,
    /// Accepted resends per identity per hour (default 5). Env var: `OTP_RESEND_MAX_PER_WINDOW`.
    pub otp_resend_max_per_window: u32,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            brevo_api_key: std::env::var("BREVO_API_KEY").expect("BREVO_API_KEY"),
            brevo_api_url: std::env::var("BREVO_API_URL")
                .unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".to_owned()),
            support_email: std::env::var("SUPPORT_EMAIL").expect("SUPPORT_EMAIL"),
            otp_resend_max_per_window: std::env::var("OTP_RESEND_MAX_PER_WINDOW")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::domain::types::DEFAULT_RESEND_MAX_PER_WINDOW),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3112),
        }
    }
}
