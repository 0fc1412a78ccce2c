use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use rydroo_auth_types::cookie::{
    ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, clear_cookies, set_access_token_cookie,
    set_refresh_token_cookie,
};

use crate::domain::types::User;
use crate::error::AuthServiceError;
use crate::handlers::otp::MessageResponse;
use crate::state::AppState;
use crate::usecase::otp::IssueOtpUseCase;
use crate::usecase::session::{LogoutUseCase, RefreshSessionUseCase};
use crate::usecase::token::TokenPair;
use crate::usecase::user::{LoginInput, LoginOutcome, LoginUseCase, SignupInput, SignupUseCase};

#[derive(Serialize)]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub message: &'static str,
    pub user: UserResponse,
}

fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name).map(|c| c.value().to_owned())
}

fn with_tokens(jar: CookieJar, tokens: TokenPair, domain: &str) -> CookieJar {
    let jar = set_access_token_cookie(jar, tokens.access_token, domain.to_owned());
    set_refresh_token_cookie(jar, tokens.refresh_token, domain.to_owned())
}

fn user_response(user: User, with_id: bool) -> UserResponse {
    UserResponse {
        id: with_id.then(|| user.id.to_string()),
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email.into_string(),
    }
}

// ── POST /users/signup ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), AuthServiceError> {
    let usecase = SignupUseCase {
        users: state.user_repo(),
        issuer: IssueOtpUseCase {
            otps: state.otp_repo(),
            sender: state.otp_sender(),
            clock: state.clock(),
        },
        clock: state.clock(),
    };
    let user = usecase
        .execute(SignupInput {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User registered! Please verify your email.",
            user: user_response(user, false),
        }),
    ))
}

// ── POST /users/login ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
        clock: state.clock(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let outcome = usecase
        .execute(LoginInput {
            session_token: cookie_value(&jar, ACCESS_TOKEN_COOKIE),
            email: body.email,
            password: body.password,
        })
        .await?;

    let out = match outcome {
        LoginOutcome::AlreadyLoggedIn => {
            return Ok(Json(MessageResponse {
                message: "User is already logged in.",
            })
            .into_response());
        }
        LoginOutcome::LoggedIn(out) => out,
    };

    let jar = with_tokens(jar, out.tokens, &state.cookie_domain);
    Ok((
        StatusCode::OK,
        jar,
        Json(UserEnvelope {
            message: "User successfully logged in",
            user: user_response(out.user, true),
        }),
    )
        .into_response())
}

// ── POST /users/refresh ──────────────────────────────────────────────────────

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RefreshSessionUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
        clock: state.clock(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(cookie_value(&jar, REFRESH_TOKEN_COOKIE).as_deref())
        .await?;

    let jar = with_tokens(jar, out.tokens, &state.cookie_domain);
    Ok((
        StatusCode::OK,
        jar,
        Json(UserEnvelope {
            message: "Session refreshed",
            user: user_response(out.user, true),
        }),
    ))
}

// ── POST /users/logout ───────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LogoutUseCase {
        sessions: state.session_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    usecase
        .execute(cookie_value(&jar, REFRESH_TOKEN_COOKIE).as_deref())
        .await?;

    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((
        StatusCode::OK,
        jar,
        Json(MessageResponse {
            message: "Successfully logged out",
        }),
    ))
}
