//! Request/response types for auth, profile, and two-factor endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::User;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login outcome. `requires_totp` is a flow marker, not an error: when set,
/// only a challenge cookie was issued and the client must submit a code.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub email: String,
    pub full_name: Option<String>,
    pub requires_totp: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyTotpRequest {
    pub code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            job_title: user.job_title.clone(),
        }
    }
}

/// Partial profile update; absent fields are left untouched.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TotpSetupRequest {
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TotpSetupResponse {
    /// Base32 secret for manual entry.
    pub secret: String,
    /// `otpauth://totp/...` provisioning URI.
    pub otpauth_url: String,
    /// QR rendering of the URI, PNG as base64.
    pub qr_code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TotpConfirmRequest {
    pub password: String,
    /// The secret handed out by `/totp/setup`.
    pub secret: String,
    pub code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TotpDisableRequest {
    pub password: String,
    pub code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TotpStatusResponse {
    pub two_factor_enabled: bool,
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
