//! Login and two-factor verification endpoints.
//!
//! Per-attempt protocol: credentials first; if the account has two-factor
//! enabled the password step yields only a challenge token, and the session
//! is issued by `verify_totp` once a code checks out. A rejected or expired
//! challenge means the whole login restarts.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::{
    error::AuthError,
    session::{
        challenge_cookie, clear_cookie, extract_cookie, session_cookie, CHALLENGE_COOKIE_NAME,
    },
    state::AuthState,
    types::{LoginRequest, LoginResponse, VerifyTotpRequest},
    utils::normalize_email,
};
use crate::{
    password,
    token::{TokenKind, CHALLENGE_TOKEN_TTL_SECONDS},
    totp::TotpService,
    users::{self, User},
};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, or totp code required", body = LoginResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let email = normalize_email(&request.email);
    let user = match users::repo::lookup_by_email(&pool, &email).await {
        Ok(Some(user)) => user,
        // Unknown account: same outcome as a wrong password.
        Ok(None) => return AuthError::InvalidCredentials.into_response(),
        Err(err) => {
            error!("Failed to lookup user: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if !password::verify_password(&request.password, &user.password_hash) {
        return AuthError::InvalidCredentials.into_response();
    }

    if user.two_factor_enabled {
        // The password step must never yield a usable session for a
        // two-factor account; only the short-lived challenge goes out.
        return issue_challenge(&auth_state, &user);
    }

    issue_session(&auth_state, &user)
}

#[utoipa::path(
    post,
    path = "/auth/verify-totp",
    request_body = VerifyTotpRequest,
    responses(
        (status = 200, description = "Code accepted, session issued", body = LoginResponse),
        (status = 400, description = "Invalid code"),
        (status = 401, description = "Missing or expired challenge")
    ),
    tag = "auth"
)]
pub async fn verify_totp(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    totp_service: Extension<TotpService>,
    payload: Option<Json<VerifyTotpRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let Some(token) = extract_cookie(&headers, CHALLENGE_COOKIE_NAME) else {
        return AuthError::InvalidToken.into_response();
    };

    // An invalid or expired challenge is terminal; the user restarts login.
    let Ok(verified) = auth_state.codec().verify(&token, TokenKind::TotpChallenge) else {
        return AuthError::InvalidToken.into_response();
    };

    let user = match users::repo::lookup_by_id(&pool, verified.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return AuthError::InvalidToken.into_response(),
        Err(err) => {
            error!("Failed to lookup user: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Fail closed if two-factor was disabled while the challenge was in
    // flight.
    if !user.two_factor_enabled {
        return AuthError::TwoFactorNotConfigured.into_response();
    }
    let Some(secret) = user.two_factor_secret.as_deref() else {
        return AuthError::TwoFactorNotConfigured.into_response();
    };

    if !totp_service.check_code(secret, &request.code) {
        return AuthError::InvalidTwoFactorCode.into_response();
    }

    issue_session_clearing_challenge(&auth_state, &user)
}

fn issue_challenge(auth_state: &AuthState, user: &User) -> Response {
    let issued = match auth_state.codec().issue(
        user.id,
        TokenKind::TotpChallenge,
        CHALLENGE_TOKEN_TTL_SECONDS,
    ) {
        Ok(issued) => issued,
        Err(err) => {
            error!("Failed to issue challenge token: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Ok(cookie) = challenge_cookie(auth_state.config(), &issued.token) else {
        error!("Failed to build challenge cookie");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(SET_COOKIE, cookie);
    (
        StatusCode::OK,
        response_headers,
        Json(LoginResponse {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            requires_totp: true,
        }),
    )
        .into_response()
}

fn issue_session(auth_state: &AuthState, user: &User) -> Response {
    match session_response_headers(auth_state, user) {
        Ok(response_headers) => (
            StatusCode::OK,
            response_headers,
            Json(LoginResponse {
                email: user.email.clone(),
                full_name: user.full_name.clone(),
                requires_totp: false,
            }),
        )
            .into_response(),
        Err(response) => response,
    }
}

fn issue_session_clearing_challenge(auth_state: &AuthState, user: &User) -> Response {
    match session_response_headers(auth_state, user) {
        Ok(mut response_headers) => {
            if let Ok(cookie) = clear_cookie(auth_state.config(), CHALLENGE_COOKIE_NAME) {
                response_headers.append(SET_COOKIE, cookie);
            }
            (
                StatusCode::OK,
                response_headers,
                Json(LoginResponse {
                    email: user.email.clone(),
                    full_name: user.full_name.clone(),
                    requires_totp: false,
                }),
            )
                .into_response()
        }
        Err(response) => response,
    }
}

fn session_response_headers(auth_state: &AuthState, user: &User) -> Result<HeaderMap, Response> {
    let ttl_seconds = auth_state.config().session_ttl_seconds();
    let issued = match auth_state
        .codec()
        .issue(user.id, TokenKind::Session, ttl_seconds)
    {
        Ok(issued) => issued,
        Err(err) => {
            error!("Failed to issue session token: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
    };

    let Ok(cookie) = session_cookie(auth_state.config(), &issued.token) else {
        error!("Failed to build session cookie");
        return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(SET_COOKIE, cookie);
    Ok(response_headers)
}
