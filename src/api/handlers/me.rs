//! Profile and password endpoints for the current user.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::auth::{
    principal::require_auth,
    types::{MessageResponse, ProfileResponse, UpdatePasswordRequest, UpdateProfileRequest},
    AuthState,
};
use crate::{
    password,
    users::repo::{self, ProfilePatch},
};

#[utoipa::path(
    get,
    path = "/user/profile",
    responses(
        (status = 200, description = "Current user profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "user"
)]
pub async fn profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    match require_auth(&headers, &pool, &auth_state).await {
        Ok(user) => (StatusCode::OK, Json(ProfileResponse::from(&user))).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/user/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "user"
)]
pub async fn update_profile(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<UpdateProfileRequest>>,
) -> Response {
    let user = match require_auth(&headers, &pool, &auth_state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    // Only provided fields overwrite; everything else keeps its value.
    let patch = ProfilePatch {
        full_name: request.full_name,
        phone: request.phone,
        job_title: request.job_title,
    };

    match repo::update_profile(&pool, user.id, &patch).await {
        Ok(Some(updated)) => (StatusCode::OK, Json(ProfileResponse::from(&updated))).into_response(),
        Ok(None) => super::auth::error::AuthError::InvalidToken.into_response(),
        Err(err) => {
            error!("Failed to update profile: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/user/password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Current password is incorrect"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "user"
)]
pub async fn update_password(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<UpdatePasswordRequest>>,
) -> Response {
    let user = match require_auth(&headers, &pool, &auth_state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    if !password::verify_password(&request.current_password, &user.password_hash) {
        return (
            StatusCode::BAD_REQUEST,
            "Current password is incorrect".to_string(),
        )
            .into_response();
    }

    // The strength policy applies at registration only; the change path
    // accepts whatever the caller chooses.
    let password_hash = match password::hash_password(&request.new_password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match repo::update_password_hash(&pool, user.id, &password_hash).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Password updated successfully".to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to update password: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
