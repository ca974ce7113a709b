//! User records as stored in the users table.

use uuid::Uuid;

/// A registered account.
///
/// `two_factor_secret` is present iff two-factor is enabled; the two columns
/// always move together (see `totp::repo`).
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub is_active: bool,
    pub two_factor_enabled: bool,
    pub two_factor_secret: Option<String>,
}
