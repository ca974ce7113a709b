//! Signed session and challenge tokens.
//!
//! Tokens are compact JWTs (HS256, single server-held key) with three data
//! claims (`sub`, `exp`, `jti`) plus a `kind` tag that separates full
//! sessions from two-factor challenges. The codec is stateless: revocation
//! lives in [`revocation`] and is the caller's responsibility to consult.
//!
//! Verification failures collapse into one opaque [`TokenError::Invalid`];
//! callers cannot tell a bad signature from an expired or malformed token.

pub mod revocation;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Challenge tokens only live long enough to type in an authenticator code.
pub const CHALLENGE_TOKEN_TTL_SECONDS: u64 = 5 * 60;

/// What a token is allowed to prove.
///
/// The kind is a signed claim, so a challenge token presented where a
/// session is expected fails verification outright, independent of which
/// cookie carried it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Full session issued after all required factors passed.
    Session,
    /// Short-lived proof of password success, pending a TOTP code.
    TotpChallenge,
}

/// Claims carried by every farmgate token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user UUID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Unique token id, the unit of revocation
    pub jti: String,
    /// Token kind
    pub kind: TokenKind,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed, bad signature, expired, or wrong kind. The distinction
    /// must not leak to clients.
    #[error("invalid token")]
    Invalid,
    #[error("system clock before unix epoch")]
    Clock,
}

/// A freshly issued token plus the metadata callers need for cookies and
/// revocation bookkeeping.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: u64,
}

/// Outcome of a successful verification.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub user_id: Uuid,
    pub jti: String,
}

/// Stateless issue/verify over a shared symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token of `kind` for `user_id`, expiring `ttl_seconds` from now.
    ///
    /// The `jti` comes from a v4 UUID, i.e. 122 random bits; collisions are
    /// negligible and uniqueness is not re-checked anywhere.
    ///
    /// # Errors
    /// Returns an error if the system clock is unusable or encoding fails.
    pub fn issue(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        ttl_seconds: u64,
    ) -> Result<IssuedToken, TokenError> {
        let now = unix_now()?;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + ttl_seconds,
            jti: Uuid::new_v4().to_string(),
            kind,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Invalid)?;

        Ok(IssuedToken {
            token,
            jti: claims.jti,
            expires_at: claims.exp,
        })
    }

    /// Verify signature, expiry, and kind, in that order.
    ///
    /// # Errors
    /// Any failure (malformed input, bad signature, expired, kind mismatch,
    /// unparseable subject) is reported as [`TokenError::Invalid`].
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<VerifiedToken, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below with a strict comparison: a token whose
        // `exp` equals the current second is already expired. The library
        // check treats that boundary as valid, so it is bypassed here.
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Invalid)?;

        let now = unix_now()?;
        if now >= data.claims.exp {
            return Err(TokenError::Invalid);
        }

        if data.claims.kind != expected {
            return Err(TokenError::Invalid);
        }

        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)?;

        Ok(VerifiedToken {
            user_id,
            jti: data.claims.jti,
        })
    }
}

fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .map_err(|_| TokenError::Clock)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test-secret-key-for-testing")
    }

    #[test]
    fn issue_and_verify_session_token() {
        let codec = codec();
        let user_id = Uuid::new_v4();

        let issued = codec.issue(user_id, TokenKind::Session, 60).unwrap();
        assert!(!issued.jti.is_empty());

        let verified = codec.verify(&issued.token, TokenKind::Session).unwrap();
        assert_eq!(verified.user_id, user_id);
        assert_eq!(verified.jti, issued.jti);
    }

    #[test]
    fn challenge_token_rejected_as_session() {
        let codec = codec();
        let user_id = Uuid::new_v4();

        let challenge = codec
            .issue(user_id, TokenKind::TotpChallenge, 60)
            .unwrap();
        let session = codec.issue(user_id, TokenKind::Session, 60).unwrap();

        assert!(codec.verify(&challenge.token, TokenKind::Session).is_err());
        assert!(codec
            .verify(&session.token, TokenKind::TotpChallenge)
            .is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let codec_one = TokenCodec::new(b"secret-1");
        let codec_two = TokenCodec::new(b"secret-2");

        let issued = codec_one
            .issue(Uuid::new_v4(), TokenKind::Session, 60)
            .unwrap();

        assert!(codec_two.verify(&issued.token, TokenKind::Session).is_err());
    }

    #[test]
    fn malformed_token_rejected() {
        assert!(codec().verify("not-a-token", TokenKind::Session).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let secret = b"test-secret";
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: unix_now().unwrap() - 50,
            jti: Uuid::new_v4().to_string(),
            kind: TokenKind::Session,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        let codec = TokenCodec::new(secret);
        assert!(codec.verify(&token, TokenKind::Session).is_err());
    }

    #[test]
    fn expiry_boundary_is_strict() {
        // exp == now must already count as expired.
        let secret = b"test-secret";
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: unix_now().unwrap(),
            jti: Uuid::new_v4().to_string(),
            kind: TokenKind::Session,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        let codec = TokenCodec::new(secret);
        assert!(codec.verify(&token, TokenKind::Session).is_err());
    }

    #[test]
    fn non_uuid_subject_rejected() {
        let secret = b"test-secret";
        let claims = Claims {
            sub: "42".to_string(),
            exp: unix_now().unwrap() + 60,
            jti: Uuid::new_v4().to_string(),
            kind: TokenKind::Session,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        let codec = TokenCodec::new(secret);
        assert!(codec.verify(&token, TokenKind::Session).is_err());
    }

    #[test]
    fn unique_jti_per_token() {
        let codec = codec();
        let user_id = Uuid::new_v4();

        let first = codec.issue(user_id, TokenKind::Session, 60).unwrap();
        let second = codec.issue(user_id, TokenKind::Session, 60).unwrap();

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn token_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TokenKind::TotpChallenge).unwrap(),
            "\"totp_challenge\""
        );
        assert_eq!(
            serde_json::to_string(&TokenKind::Session).unwrap(),
            "\"session\""
        );
    }
}
