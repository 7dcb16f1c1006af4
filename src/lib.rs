// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! VibeCheck: swipe on startup ideas.
//!
//! This crate provides the backend API: federated login, a personalized
//! feed of idea cards, swipe recording with statistics, idea authoring
//! with ordered media, and presigned object-storage uploads.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;
use services::{OidcVerifier, S3Presigner, SessionTokens};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn Store>,
    pub tokens: SessionTokens,
    /// `None` when OIDC is not configured; login then answers 503.
    pub oidc_verifier: Option<Arc<OidcVerifier>>,
    /// `None` when no bucket is configured; upload URLs then answer 503.
    pub presigner: Option<S3Presigner>,
}

impl AppState {
    /// Wire up services from configuration.
    pub fn new(config: Config, db: Arc<dyn Store>) -> anyhow::Result<Self> {
        let tokens = SessionTokens::from_config(&config);

        let oidc_verifier = match &config.oidc {
            Some(settings) => {
                tracing::info!(issuer = %settings.issuer, "OIDC login enabled");
                Some(Arc::new(OidcVerifier::new(settings)?))
            }
            None => {
                tracing::warn!("OIDC is not configured; login disabled");
                None
            }
        };

        let presigner = S3Presigner::from_settings(&config.storage)?;
        if presigner.is_none() {
            tracing::warn!("S3 is not configured; uploads disabled");
        }

        Ok(Self {
            config,
            db,
            tokens,
            oidc_verifier,
            presigner,
        })
    }
}
