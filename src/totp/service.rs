//! Two-factor enrollment and code verification.
//!
//! Per-user state machine: disabled, pending setup, enabled. Setup is
//! two-phase: [`TotpService::begin_setup`] hands the client a fresh secret
//! without persisting anything, and only [`TotpService::confirm_setup`]
//! (proof that the user's authenticator produces matching codes) writes
//! the secret and flips the flag. A failed confirm retains nothing; setup
//! restarts from scratch.
//!
//! Codes are standard 6-digit / 30-second-step TOTP with ±1 step of
//! tolerance for clock skew. Replay inside one accepted step is an inherent
//! property of the algorithm; no used-code state is tracked.

use anyhow::{anyhow, Context, Result};
use rand::{rngs::OsRng, RngCore};
use sqlx::PgPool;
use totp_rs::{Algorithm, Secret, TOTP};
use uuid::Uuid;

use crate::totp::repo;

// RFC 4226 recommended seed length (160 bits).
const SECRET_BYTES: usize = 20;

/// Everything the client needs to enroll an authenticator app.
#[derive(Debug, Clone)]
pub struct TotpSetup {
    /// Base32 secret for manual entry.
    pub secret: String,
    /// `otpauth://totp/...` provisioning URI.
    pub otpauth_url: String,
    /// QR rendering of the URI, PNG as base64.
    pub qr_code: String,
}

#[derive(Clone)]
pub struct TotpService {
    issuer: String,
}

impl TotpService {
    #[must_use]
    pub fn new(issuer: String) -> Self {
        Self { issuer }
    }

    /// Generate a fresh secret and its provisioning material.
    ///
    /// Touches no storage: the secret only becomes active once
    /// `confirm_setup` verifies a code generated from it.
    ///
    /// # Errors
    /// Returns an error if secret generation or QR rendering fails.
    pub fn begin_setup(&self, account: &str) -> Result<TotpSetup> {
        let mut seed = [0u8; SECRET_BYTES];
        OsRng
            .try_fill_bytes(&mut seed)
            .context("failed to generate TOTP secret")?;

        let totp = self.totp(seed.to_vec(), account)?;
        let qr_code = totp
            .get_qr_base64()
            .map_err(|err| anyhow!("failed to render QR code: {err}"))?;

        Ok(TotpSetup {
            secret: totp.get_secret_base32(),
            otpauth_url: totp.get_url(),
            qr_code,
        })
    }

    /// Check a 6-digit code against a base32 secret.
    ///
    /// Undecodable secrets and clock failures verify as false; there is
    /// nothing more useful to do with either at a login boundary.
    #[must_use]
    pub fn check_code(&self, secret_base32: &str, code: &str) -> bool {
        let Ok(secret_bytes) = Secret::Encoded(secret_base32.to_string()).to_bytes() else {
            return false;
        };
        // Account label is irrelevant for verification.
        let Ok(totp) = self.totp(secret_bytes, "user") else {
            return false;
        };
        totp.check_current(code).unwrap_or(false)
    }

    /// Verify the first code against a setup secret and, on success, persist
    /// it and enable two-factor for the user.
    ///
    /// # Errors
    /// Returns an error if the database update fails.
    pub async fn confirm_setup(
        &self,
        pool: &PgPool,
        user_id: Uuid,
        secret_base32: &str,
        code: &str,
    ) -> Result<bool> {
        if !self.check_code(secret_base32, code) {
            return Ok(false);
        }
        repo::enable_two_factor(pool, user_id, secret_base32).await?;
        Ok(true)
    }

    /// Turn two-factor off, gated on a valid current code.
    ///
    /// # Errors
    /// Returns an error if the database update fails.
    pub async fn disable(
        &self,
        pool: &PgPool,
        user_id: Uuid,
        secret_base32: &str,
        code: &str,
    ) -> Result<bool> {
        if !self.check_code(secret_base32, code) {
            return Ok(false);
        }
        repo::disable_two_factor(pool, user_id).await?;
        Ok(true)
    }

    fn totp(&self, secret_bytes: Vec<u8>, account: &str) -> Result<TOTP> {
        // 6 digits, 30 second step, skew of 1 step either side.
        TOTP::new(
            Algorithm::SHA1,
            6,
            1,
            30,
            secret_bytes,
            Some(self.issuer.clone()),
            account.to_string(),
        )
        .map_err(|err| anyhow!("failed to build TOTP: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TotpService {
        TotpService::new("Digital Farm".to_string())
    }

    fn current_code(secret_base32: &str) -> String {
        let secret_bytes = Secret::Encoded(secret_base32.to_string())
            .to_bytes()
            .unwrap();
        let totp = TOTP::new(
            Algorithm::SHA1,
            6,
            1,
            30,
            secret_bytes,
            Some("Digital Farm".to_string()),
            "user".to_string(),
        )
        .unwrap();
        totp.generate_current().unwrap()
    }

    #[test]
    fn begin_setup_produces_provisioning_material() -> Result<()> {
        let setup = service().begin_setup("alice@example.com")?;

        assert!(!setup.secret.is_empty());
        assert!(setup.otpauth_url.starts_with("otpauth://totp/"));
        assert!(setup.otpauth_url.contains("issuer=Digital%20Farm"));
        assert!(setup.otpauth_url.contains("alice%40example.com"));
        assert!(!setup.qr_code.is_empty());
        Ok(())
    }

    #[test]
    fn begin_setup_secrets_are_unique() -> Result<()> {
        let service = service();
        let first = service.begin_setup("alice@example.com")?;
        let second = service.begin_setup("alice@example.com")?;
        assert_ne!(first.secret, second.secret);
        Ok(())
    }

    #[test]
    fn check_code_accepts_current_step() -> Result<()> {
        let service = service();
        let setup = service.begin_setup("alice@example.com")?;

        let code = current_code(&setup.secret);
        assert!(service.check_code(&setup.secret, &code));
        Ok(())
    }

    #[test]
    fn check_code_rejects_code_from_other_secret() -> Result<()> {
        let service = service();
        let setup = service.begin_setup("alice@example.com")?;
        let other = service.begin_setup("alice@example.com")?;

        let code = current_code(&other.secret);
        assert!(!service.check_code(&setup.secret, &code));
        Ok(())
    }

    #[test]
    fn check_code_rejects_garbage() -> Result<()> {
        let service = service();
        let setup = service.begin_setup("alice@example.com")?;

        assert!(!service.check_code(&setup.secret, "000000"));
        assert!(!service.check_code(&setup.secret, "not-a-code"));
        assert!(!service.check_code("!!!not-base32!!!", "123456"));
        Ok(())
    }

    #[test]
    fn codes_replay_within_the_accepted_window() -> Result<()> {
        // Accepted property of the algorithm: the same code keeps verifying
        // for the duration of its step (plus skew). Pin it so nobody
        // "fixes" it into stateful single-use tracking by accident.
        let service = service();
        let setup = service.begin_setup("alice@example.com")?;

        let code = current_code(&setup.secret);
        assert!(service.check_code(&setup.secret, &code));
        assert!(service.check_code(&setup.secret, &code));
        Ok(())
    }
}
