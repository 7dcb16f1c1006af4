// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token issuing and verification (HS256).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;

/// Session token claims.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub iss: String,
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Any verification failure; the cause is only logged.
    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl_seconds: u64,
}

impl SessionTokens {
    pub fn new(secret: &[u8], issuer: &str, audience: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            ttl_seconds,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            &config.jwt_issuer,
            &config.jwt_audience,
            config.jwt_ttl_seconds,
        )
    }

    /// Mint a token for `subject` valid for the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = now_unix_secs();
        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Check signature, issuer, audience and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                TokenError::Invalid
            })
    }
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_jwt_key_32_bytes_minimum!!";

    fn tokens() -> SessionTokens {
        SessionTokens::new(SECRET, "vibecheck", "vibecheck-api", 3600)
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = tokens();
        let token = codec.issue("user-1").unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.iss, "vibecheck");
        assert_eq!(claims.aud, "vibecheck-api");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = tokens().issue("user-1").unwrap();
        let other = SessionTokens::new(
            b"another_secret_that_is_long!!!!",
            "vibecheck",
            "vibecheck-api",
            3600,
        );

        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_huge_ttl_saturates_expiry() {
        let codec = SessionTokens::new(SECRET, "vibecheck", "vibecheck-api", u64::MAX);

        let token = codec.issue("user-1").unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.exp, u64::MAX);
    }

    #[test]
    fn test_wrong_audience_and_issuer_rejected() {
        let token = tokens().issue("user-1").unwrap();

        let wrong_aud = SessionTokens::new(SECRET, "vibecheck", "someone-else", 3600);
        assert!(matches!(wrong_aud.verify(&token), Err(TokenError::Invalid)));

        let wrong_iss = SessionTokens::new(SECRET, "other-issuer", "vibecheck-api", 3600);
        assert!(matches!(wrong_iss.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_rejected() {
        let now = now_unix_secs();
        let claims = Claims {
            sub: "user-1".to_string(),
            iss: "vibecheck".to_string(),
            aud: "vibecheck-api".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(tokens().verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            tokens().verify("not.a.jwt"),
            Err(TokenError::Invalid)
        ));
    }
}
