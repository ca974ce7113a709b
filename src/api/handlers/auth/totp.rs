//! Two-factor setup, confirmation, disable, and status endpoints.
//!
//! All of these require an authenticated session, and the mutating ones
//! additionally re-verify the account password; holding a session cookie is
//! not enough to change second-factor state.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::{
    error::AuthError,
    principal::require_auth,
    state::AuthState,
    types::{
        MessageResponse, TotpConfirmRequest, TotpDisableRequest, TotpSetupRequest,
        TotpSetupResponse, TotpStatusResponse,
    },
};
use crate::{password, totp::TotpService};

#[utoipa::path(
    post,
    path = "/totp/setup",
    request_body = TotpSetupRequest,
    responses(
        (status = 200, description = "Setup material generated", body = TotpSetupResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "2fa"
)]
pub async fn totp_setup(
    headers: axum::http::HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    totp_service: Extension<TotpService>,
    payload: Option<Json<TotpSetupRequest>>,
) -> Response {
    let user = match require_auth(&headers, &pool, &auth_state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    if !password::verify_password(&request.password, &user.password_hash) {
        return AuthError::InvalidCredentials.into_response();
    }

    // Nothing is persisted here; the secret only becomes active once the
    // user proves their authenticator via /totp/verify.
    match totp_service.begin_setup(&user.email) {
        Ok(setup) => (
            StatusCode::OK,
            Json(TotpSetupResponse {
                secret: setup.secret,
                otpauth_url: setup.otpauth_url,
                qr_code: setup.qr_code,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to start TOTP setup: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/totp/verify",
    request_body = TotpConfirmRequest,
    responses(
        (status = 200, description = "Two-factor enabled", body = MessageResponse),
        (status = 400, description = "Invalid code"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "2fa"
)]
pub async fn totp_confirm(
    headers: axum::http::HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    totp_service: Extension<TotpService>,
    payload: Option<Json<TotpConfirmRequest>>,
) -> Response {
    let user = match require_auth(&headers, &pool, &auth_state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    if !password::verify_password(&request.password, &user.password_hash) {
        return AuthError::InvalidCredentials.into_response();
    }

    match totp_service
        .confirm_setup(&pool, user.id, &request.secret, &request.code)
        .await
    {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Two-factor authentication enabled".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => AuthError::InvalidTwoFactorCode.into_response(),
        Err(err) => {
            error!("Failed to confirm TOTP setup: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/totp/disable",
    request_body = TotpDisableRequest,
    responses(
        (status = 200, description = "Two-factor disabled", body = MessageResponse),
        (status = 400, description = "Invalid code or two-factor not enabled"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "2fa"
)]
pub async fn totp_disable(
    headers: axum::http::HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    totp_service: Extension<TotpService>,
    payload: Option<Json<TotpDisableRequest>>,
) -> Response {
    let user = match require_auth(&headers, &pool, &auth_state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    if !password::verify_password(&request.password, &user.password_hash) {
        return AuthError::InvalidCredentials.into_response();
    }

    let Some(secret) = user.two_factor_secret.as_deref().filter(|_| user.two_factor_enabled)
    else {
        return AuthError::TwoFactorNotConfigured.into_response();
    };

    match totp_service
        .disable(&pool, user.id, secret, &request.code)
        .await
    {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Two-factor authentication disabled".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => AuthError::InvalidTwoFactorCode.into_response(),
        Err(err) => {
            error!("Failed to disable TOTP: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/totp/status",
    responses(
        (status = 200, description = "Current two-factor state", body = TotpStatusResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "2fa"
)]
pub async fn totp_status(
    headers: axum::http::HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    match require_auth(&headers, &pool, &auth_state).await {
        Ok(user) => (
            StatusCode::OK,
            Json(TotpStatusResponse {
                two_factor_enabled: user.two_factor_enabled,
                email: user.email,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
