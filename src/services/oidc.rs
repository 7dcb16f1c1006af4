// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Verification of third-party OIDC ID tokens used for login.
//!
//! The key set is fetched on every verification; there is no cache and no
//! retry. A failed fetch fails the login.

use anyhow::Context;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::OidcSettings;

const JWKS_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Claims of a verified ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// OIDC verification failures.
#[derive(Debug, thiserror::Error)]
pub enum OidcError {
    #[error("key set unavailable: {0}")]
    KeySetUnavailable(String),

    #[error("unknown key id")]
    UnknownKeyId,

    #[error("token rejected: {0}")]
    Rejected(String),
}

#[derive(Clone)]
enum VerifierMode {
    Remote {
        http_client: reqwest::Client,
        jwks_url: String,
    },
    StaticKey {
        kid: String,
        decoding_key: Arc<DecodingKey>,
    },
}

/// Verifier for ID tokens from the configured identity provider.
pub struct OidcVerifier {
    issuer: String,
    audience: String,
    mode: VerifierMode,
}

impl OidcVerifier {
    /// Verifier that fetches the provider's JWKS on each call.
    pub fn new(settings: &OidcSettings) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(JWKS_HTTP_TIMEOUT)
            .build()
            .context("failed building OIDC HTTP client")?;

        tracing::info!(
            issuer = %settings.issuer,
            audience = %settings.audience,
            jwks_url = %settings.jwks_url,
            "Initialized OIDC verifier"
        );

        Ok(Self {
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            mode: VerifierMode::Remote {
                http_client,
                jwks_url: settings.jwks_url.clone(),
            },
        })
    }

    /// Verifier with a single fixed key, for deterministic tests.
    pub fn new_with_static_key(
        settings: &OidcSettings,
        kid: impl Into<String>,
        decoding_key: DecodingKey,
    ) -> anyhow::Result<Self> {
        let kid = kid.into();
        if kid.trim().is_empty() {
            anyhow::bail!("static OIDC kid must not be empty");
        }

        Ok(Self {
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            mode: VerifierMode::StaticKey {
                kid,
                decoding_key: Arc::new(decoding_key),
            },
        })
    }

    /// Verify an ID token's signature, issuer and audience, returning its
    /// claims. The algorithm is the one declared in the token header.
    pub async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims, OidcError> {
        let header = decode_header(id_token)
            .map_err(|e| OidcError::Rejected(format!("invalid JWT header: {e}")))?;
        let kid = header.kid.ok_or(OidcError::UnknownKeyId)?;

        let decoding_key = self.decoding_key_for_kid(&kid).await?;

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);

        let token_data = decode::<IdTokenClaims>(id_token, decoding_key.as_ref(), &validation)
            .map_err(|e| OidcError::Rejected(format!("JWT validation failed: {e}")))?;

        tracing::debug!(
            kid = %kid,
            subject = token_data.claims.sub.as_deref().unwrap_or("<missing>"),
            "ID token verified"
        );

        Ok(token_data.claims)
    }

    async fn decoding_key_for_kid(&self, kid: &str) -> Result<Arc<DecodingKey>, OidcError> {
        match &self.mode {
            VerifierMode::StaticKey {
                kid: static_kid,
                decoding_key,
            } => {
                if kid == static_kid {
                    Ok(decoding_key.clone())
                } else {
                    Err(OidcError::UnknownKeyId)
                }
            }
            VerifierMode::Remote {
                http_client,
                jwks_url,
            } => {
                let jwks = fetch_jwks(http_client, jwks_url).await?;
                let jwk = jwks.find(kid).ok_or(OidcError::UnknownKeyId)?;
                DecodingKey::from_jwk(jwk)
                    .map(Arc::new)
                    .map_err(|e| OidcError::Rejected(format!("unusable JWK {kid}: {e}")))
            }
        }
    }
}

async fn fetch_jwks(http_client: &reqwest::Client, jwks_url: &str) -> Result<JwkSet, OidcError> {
    tracing::debug!(jwks_url = %jwks_url, "Fetching JWKS");

    let response = http_client
        .get(jwks_url)
        .send()
        .await
        .map_err(|e| OidcError::KeySetUnavailable(format!("JWKS request failed: {e}")))?;

    if !response.status().is_success() {
        return Err(OidcError::KeySetUnavailable(format!(
            "JWKS request returned status {}",
            response.status()
        )));
    }

    response
        .json::<JwkSet>()
        .await
        .map_err(|e| OidcError::KeySetUnavailable(format!("invalid JWKS JSON: {e}")))
}
