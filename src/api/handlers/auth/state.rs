//! Auth configuration and shared state.

use secrecy::{ExposeSecret, SecretString};

use crate::token::TokenCodec;

const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60;
const DEFAULT_TOTP_ISSUER: &str = "Digital Farm";

/// Startup configuration for the auth surface.
///
/// The signing key and cookie flags live here and are injected at
/// construction; nothing reads them from ambient state.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    secret_key: SecretString,
    frontend_base_url: String,
    session_ttl_seconds: u64,
    totp_issuer: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(secret_key: SecretString, frontend_base_url: String) -> Self {
        Self {
            secret_key,
            frontend_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            totp_issuer: DEFAULT_TOTP_ISSUER.to_string(),
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_totp_issuer(mut self, issuer: String) -> Self {
        self.totp_issuer = issuer;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn totp_issuer(&self) -> &str {
        &self.totp_issuer
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    /// Only mark cookies secure when the frontend is served over HTTPS.
    pub(super) fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }

    fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }
}

/// Shared auth state: configuration plus the token codec built from it.
pub struct AuthState {
    config: AuthConfig,
    codec: TokenCodec,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let codec = TokenCodec::new(config.secret_key().expose_secret().as_bytes());
        Self { config, codec }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
