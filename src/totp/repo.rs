//! Two-factor columns on the users table.
//!
//! The secret and the enabled flag move together in a single statement:
//! a user is never enabled without a secret, and disabling always clears it.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

/// Persist a confirmed secret and enable two-factor.
///
/// # Errors
/// Returns an error if the update fails.
pub(crate) async fn enable_two_factor(
    pool: &PgPool,
    user_id: Uuid,
    secret_base32: &str,
) -> Result<()> {
    let query = r"
        UPDATE users
        SET two_factor_enabled = TRUE,
            two_factor_secret = $2
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .bind(secret_base32)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to enable two-factor")?;
    Ok(())
}

/// Disable two-factor and clear the stored secret.
///
/// # Errors
/// Returns an error if the update fails.
pub(crate) async fn disable_two_factor(pool: &PgPool, user_id: Uuid) -> Result<()> {
    let query = r"
        UPDATE users
        SET two_factor_enabled = FALSE,
            two_factor_secret = NULL
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to disable two-factor")?;
    Ok(())
}
