// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Optional integrations (OIDC login, object storage, admin ingestion) are
//! represented as `Option`s; the routes that need them answer 503/403 when
//! they are absent instead of failing start-up.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Server ---
    /// Server port
    pub port: u16,
    /// Deployment environment name ("local", "prod", ...)
    pub app_env: String,
    /// Origins allowed by CORS in addition to localhost
    pub cors_origins: Vec<String>,

    // --- Database ---
    /// SQLite database path (`:memory:` for an ephemeral database)
    pub database_path: String,
    /// Number of pooled SQLite connections
    pub db_pool_size: usize,

    // --- Session tokens ---
    /// HS256 signing key for session tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_ttl_seconds: u64,

    // --- Federated login ---
    pub oidc: Option<OidcSettings>,
    /// When set, login requests must name exactly this provider.
    pub oidc_provider: Option<String>,

    /// Shared secret for `X-Admin-Key`; admin ingestion is disabled when unset.
    pub admin_api_key: Option<String>,

    // --- Object storage ---
    pub storage: StorageSettings,
}

/// External identity provider settings. Present only when issuer, key-set
/// URL and audience are all configured.
#[derive(Debug, Clone)]
pub struct OidcSettings {
    pub issuer: String,
    pub jwks_url: String,
    pub audience: String,
}

/// S3-compatible object storage settings.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub region: String,
    pub bucket: Option<String>,
    /// Base URL override (e.g. a path-style MinIO endpoint including the bucket).
    pub endpoint: Option<String>,
    pub avatar_prefix: String,
    pub presign_ttl_seconds: u64,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

impl Config {
    /// Config for tests: in-memory database, no OIDC, no storage.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            app_env: "test".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
            database_path: ":memory:".to_string(),
            db_pool_size: 1,
            jwt_secret: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            jwt_issuer: "vibecheck".to_string(),
            jwt_audience: "vibecheck-api".to_string(),
            jwt_ttl_seconds: 7 * 24 * 60 * 60,
            oidc: None,
            oidc_provider: None,
            admin_api_key: Some("test_admin_key".to_string()),
            storage: StorageSettings {
                region: "us-east-1".to_string(),
                bucket: None,
                endpoint: None,
                avatar_prefix: "avatars/".to_string(),
                presign_ttl_seconds: 3600,
                access_key_id: None,
                secret_access_key: None,
                session_token: None,
            },
        }
    }

    /// Whether this is a production deployment (`APP_ENV` of `prod` or
    /// `production`).
    pub fn is_production(&self) -> bool {
        let env = self.app_env.trim();
        env.eq_ignore_ascii_case("prod") || env.eq_ignore_ascii_case("production")
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let oidc = match (
            non_empty_var("OIDC_ISSUER"),
            non_empty_var("OIDC_JWKS_URL"),
            non_empty_var("OIDC_AUDIENCE"),
        ) {
            (Some(issuer), Some(jwks_url), Some(audience)) => Some(OidcSettings {
                issuer,
                jwks_url,
                audience,
            }),
            _ => None,
        };

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            cors_origins: non_empty_var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            database_path: database_path_from_url(
                &env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            ),
            db_pool_size: parse_var("DB_POOL_SIZE", 10)?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET"))?
                .into_bytes(),
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "vibecheck".to_string()),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "vibecheck-api".to_string()),
            jwt_ttl_seconds: parse_var("JWT_TTL_SECONDS", 7 * 24 * 60 * 60)?,

            oidc,
            oidc_provider: non_empty_var("OIDC_PROVIDER"),
            admin_api_key: non_empty_var("ADMIN_API_KEY").map(|v| v.trim().to_string()),

            storage: StorageSettings {
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                bucket: non_empty_var("S3_BUCKET"),
                endpoint: non_empty_var("S3_ENDPOINT"),
                avatar_prefix: env::var("S3_AVATAR_PREFIX")
                    .unwrap_or_else(|_| "avatars/".to_string()),
                presign_ttl_seconds: parse_var("S3_PRESIGN_TTL_SECONDS", 3600)?,
                access_key_id: non_empty_var("AWS_ACCESS_KEY_ID"),
                secret_access_key: non_empty_var("AWS_SECRET_ACCESS_KEY"),
                session_token: non_empty_var("AWS_SESSION_TOKEN"),
            },
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Accept either a bare path or a `sqlite://` URL.
fn database_path_from_url(url: &str) -> String {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
        .to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
