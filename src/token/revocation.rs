//! Durable registry of revoked token ids.
//!
//! Append-only: rows are written on logout and never updated or deleted.
//! Membership here is what makes a stolen-but-unexpired token useless after
//! logout, so `revoke` must be visible to every subsequent `is_revoked` as
//! soon as it returns.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;

/// Record `jti` as revoked.
///
/// Idempotent: concurrent or repeated revocations of the same `jti` collapse
/// into a single row and all succeed.
///
/// # Errors
/// Returns an error if the insert fails.
pub async fn revoke(pool: &PgPool, jti: &str) -> Result<()> {
    let query = r"
        INSERT INTO revoked_tokens (jti, revoked_at)
        VALUES ($1, NOW())
        ON CONFLICT (jti) DO NOTHING
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(jti)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert revoked token")?;
    Ok(())
}

/// Membership query for the revocation set.
///
/// # Errors
/// Returns an error if the lookup fails.
pub async fn is_revoked(pool: &PgPool, jti: &str) -> Result<bool> {
    let query = "SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = $1) AS revoked";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(jti)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to check revoked token")?;
    Ok(row.get("revoked"))
}
