//! Client-visible authentication failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Terminal failures for an authentication attempt. No retry semantics;
/// every verification step is all-or-nothing.
///
/// Unknown accounts and wrong passwords both map to `InvalidCredentials`,
/// and all token verification failures map to `InvalidToken`, so responses
/// cannot be used to enumerate accounts or debug signatures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Token has been revoked")]
    TokenRevoked,
    #[error("Authenticator code is invalid")]
    InvalidTwoFactorCode,
    #[error("Two-factor authentication is not enabled")]
    TwoFactorNotConfigured,
    #[error("Password does not meet the strength policy")]
    PolicyViolation,
    #[error("User already exists")]
    DuplicateIdentity,
    /// Storage or crypto failure; details stay in the logs.
    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenRevoked => {
                StatusCode::UNAUTHORIZED
            }
            Self::InvalidTwoFactorCode | Self::TwoFactorNotConfigured | Self::PolicyViolation => {
                StatusCode::BAD_REQUEST
            }
            Self::DuplicateIdentity => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
