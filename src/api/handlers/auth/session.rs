//! Session cookie plumbing and logout.
//!
//! Two cookie names separate full sessions from two-factor challenges; each
//! carries a `Max-Age` matching its token's lifetime. The `kind` claim inside
//! the token is the real boundary; the cookies are transport.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::state::{AuthConfig, AuthState};
use crate::token::{revocation, TokenKind, CHALLENGE_TOKEN_TTL_SECONDS};

pub(crate) const SESSION_COOKIE_NAME: &str = "access_token";
pub(crate) const CHALLENGE_COOKIE_NAME: &str = "totp_challenge";

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    // Logout never fails outwardly: revocation is best-effort and an
    // invalid or expired token still gets a cleared cookie and a 204.
    if let Some(token) = extract_session_token(&headers) {
        if let Ok(verified) = auth_state.codec().verify(&token, TokenKind::Session) {
            if let Err(err) = revocation::revoke(&pool, &verified.jti).await {
                error!("Failed to record revocation: {err}");
            }
        }
    }

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_cookie(auth_state.config(), SESSION_COOKIE_NAME) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::NO_CONTENT, response_headers).into_response()
}

/// Build the session cookie for a freshly issued session token.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    cookie_value(
        config,
        SESSION_COOKIE_NAME,
        token,
        config.session_ttl_seconds(),
    )
}

/// Build the challenge cookie carrying a pending two-factor token.
pub(super) fn challenge_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    cookie_value(
        config,
        CHALLENGE_COOKIE_NAME,
        token,
        CHALLENGE_TOKEN_TTL_SECONDS,
    )
}

/// Expire a cookie immediately.
pub(super) fn clear_cookie(
    config: &AuthConfig,
    name: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    cookie_value(config, name, "", 0)
}

fn cookie_value(
    config: &AuthConfig,
    name: &str,
    value: &str,
    max_age_seconds: u64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Pull the session token from the Authorization header or session cookie.
pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    extract_cookie(headers, SESSION_COOKIE_NAME)
}

/// Read a named cookie from the Cookie header.
pub(super) fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
