//! Registration endpoint.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use tracing::error;

use super::{
    error::AuthError,
    types::{ProfileResponse, RegisterRequest},
    utils::{normalize_email, valid_email},
};
use crate::{
    password,
    users::repo::{self, SignupOutcome},
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = ProfileResponse),
        (status = 400, description = "Invalid email or weak password"),
        (status = 409, description = "User with the specified email already exists")
    ),
    tag = "auth"
)]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    // The strength policy runs here and only here; login must keep
    // accepting accounts created under older rules.
    if !password::validate_password(&request.password) {
        return AuthError::PolicyViolation.into_response();
    }

    let password_hash = match password::hash_password(&request.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match repo::insert(&pool, &email, &password_hash, request.full_name.as_deref()).await {
        Ok(SignupOutcome::Created(user)) => {
            (StatusCode::CREATED, Json(ProfileResponse::from(&user))).into_response()
        }
        Ok(SignupOutcome::Conflict) => AuthError::DuplicateIdentity.into_response(),
        Err(err) => {
            error!("Failed to insert user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
