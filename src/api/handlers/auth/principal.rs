//! Authenticated principal resolution for protected routes.
//!
//! Check order is fixed: signature/expiry first, then revocation, then the
//! user row. The cheapest, most decisive checks run before any storage
//! round trip.

use axum::http::HeaderMap;
use sqlx::PgPool;
use tracing::error;

use super::{error::AuthError, session::extract_session_token, state::AuthState};
use crate::{
    token::{revocation, TokenKind},
    users::{self, User},
};

/// Resolve the session token into an active user, or fail with the
/// appropriate [`AuthError`].
pub(crate) async fn require_auth(
    headers: &HeaderMap,
    pool: &PgPool,
    auth_state: &AuthState,
) -> Result<User, AuthError> {
    let Some(token) = extract_session_token(headers) else {
        return Err(AuthError::InvalidToken);
    };

    let verified = auth_state
        .codec()
        .verify(&token, TokenKind::Session)
        .map_err(|_| AuthError::InvalidToken)?;

    match revocation::is_revoked(pool, &verified.jti).await {
        Ok(true) => return Err(AuthError::TokenRevoked),
        Ok(false) => {}
        Err(err) => {
            error!("Failed to check revocation: {err}");
            return Err(AuthError::Internal);
        }
    }

    let user = users::repo::lookup_by_id(pool, verified.user_id)
        .await
        .map_err(|err| {
            error!("Failed to load user: {err}");
            AuthError::Internal
        })?;

    match user {
        Some(user) if user.is_active => Ok(user),
        // Deleted or deactivated accounts invalidate their tokens.
        _ => Err(AuthError::InvalidToken),
    }
}
