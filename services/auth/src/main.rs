use sea_orm::Database;
use tracing::info;

use rydroo_auth::config::AuthConfig;
use rydroo_auth::infra::mailer::BrevoOtpSender;
use rydroo_auth::router::build_router;
use rydroo_auth::state::AppState;
use rydroo_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let mailer = BrevoOtpSender {
        client: reqwest::Client::new(),
        api_url: config.brevo_api_url,
        api_key: config.brevo_api_key,
        sender_email: config.support_email,
    };

    let state = AppState {
        db,
        redis,
        mailer,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        otp_resend_max_per_window: config.otp_resend_max_per_window,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
