//! Auth handlers and supporting modules.
//!
//! Flow Overview:
//! 1) `login` verifies credentials; two-factor users get a five-minute
//!    challenge token in its own cookie instead of a session.
//! 2) `verify-totp` upgrades a valid challenge plus a correct code into a
//!    full session and clears the challenge cookie.
//! 3) `logout` revokes the presented token's jti best-effort and always
//!    clears the cookie.
//! 4) Every protected route resolves the caller through
//!    [`principal::require_auth`]: token checks, then revocation, then the
//!    user row.
//!
//! Security boundaries: session and challenge tokens share a codec but carry
//! distinct signed kinds, so neither is accepted where the other is
//! expected. Unknown emails and wrong passwords are indistinguishable to
//! clients.

pub(crate) mod error;
pub(crate) mod login;
pub(crate) mod principal;
pub(crate) mod register;
pub(crate) mod session;
mod state;
pub(crate) mod totp;
pub(crate) mod types;
mod utils;

pub use state::{AuthConfig, AuthState};
