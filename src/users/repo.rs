//! Database access for user records.

use anyhow::{Context, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::models::User;

const USER_COLUMNS: &str = "id, email, password_hash, full_name, phone, job_title, \
     is_active, two_factor_enabled, two_factor_secret";

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub enum SignupOutcome {
    Created(User),
    Conflict,
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        full_name: row.get("full_name"),
        phone: row.get("phone"),
        job_title: row.get("job_title"),
        is_active: row.get("is_active"),
        two_factor_enabled: row.get("two_factor_enabled"),
        two_factor_secret: row.get("two_factor_secret"),
    }
}

/// Look up a user by normalized email (login path).
///
/// # Errors
/// Returns an error if the lookup fails.
pub async fn lookup_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by email")?;
    Ok(row.as_ref().map(user_from_row))
}

/// Look up a user by id (token subject resolution).
///
/// # Errors
/// Returns an error if the lookup fails.
pub async fn lookup_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by id")?;
    Ok(row.as_ref().map(user_from_row))
}

/// Insert a new user row.
///
/// Duplicate detection relies on the unique index, not a prior SELECT, so
/// two concurrent registrations for the same email resolve to exactly one
/// `Created` and one `Conflict`.
///
/// # Errors
/// Returns an error if the insert fails for any reason other than a
/// duplicate email.
pub async fn insert(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    full_name: Option<&str>,
) -> Result<SignupOutcome> {
    let query = format!(
        "INSERT INTO users (email, password_hash, full_name) \
         VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(user_from_row(&row))),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

/// Replace the stored password hash.
///
/// # Errors
/// Returns an error if the update fails.
pub async fn update_password_hash(pool: &PgPool, user_id: Uuid, password_hash: &str) -> Result<()> {
    let query = "UPDATE users SET password_hash = $2 WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(password_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update password hash")?;
    Ok(())
}

/// Partial profile update: absent fields stay untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
}

/// Apply a profile patch and return the updated row.
///
/// Each field overwrites only when provided; `COALESCE` keeps the stored
/// value for `None` bindings.
///
/// # Errors
/// Returns an error if the update fails.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    patch: &ProfilePatch,
) -> Result<Option<User>> {
    let query = format!(
        "UPDATE users SET \
             full_name = COALESCE($2, full_name), \
             phone = COALESCE($3, phone), \
             job_title = COALESCE($4, job_title) \
         WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(user_id)
        .bind(patch.full_name.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.job_title.as_deref())
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update profile")?;
    Ok(row.as_ref().map(user_from_row))
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
