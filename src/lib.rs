//! # Farmgate (Digital Farm authentication service)
//!
//! `farmgate` owns the credential and session lifecycle for the Digital Farm
//! platform: password-based login, signed session tokens with per-token
//! revocation, and an optional TOTP second factor that gates token issuance.
//!
//! ## Sessions
//!
//! Sessions are self-contained JWTs (HS256, single server-held key) carrying
//! `sub`, `exp`, a random `jti`, and an explicit token kind. There is no
//! server-side session table; the only durable session state is the
//! append-only registry of revoked `jti` values, consulted on every
//! authenticated request.
//!
//! ## Two-factor flow
//!
//! - Setup never persists a secret until the user proves their authenticator
//!   app can produce a matching code.
//! - Login for a two-factor user yields only a short-lived challenge token;
//!   a full session is issued after the code verifies. Challenge and session
//!   tokens are signed with distinct kinds and are not interchangeable.
//!
//! ## Error posture
//!
//! Unknown accounts and wrong passwords produce the same client-visible
//! failure, and token verification reports a single opaque "invalid token"
//! condition regardless of cause.

pub mod api;
pub mod cli;
pub mod password;
pub mod token;
pub mod totp;
pub mod users;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
