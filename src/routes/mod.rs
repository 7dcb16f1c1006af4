// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod feed;
pub mod ideas;
pub mod me;
pub mod my_ideas;
pub mod stats;
pub mod swipes;

use crate::error::AppError;
use crate::middleware::{require_admin_key, require_auth};
use crate::AppState;
use axum::http::{header, HeaderName, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Client-facing URL for a stored object key: a presigned GET when storage
/// is configured, otherwise the key itself.
pub(crate) async fn display_url(state: &AppState, key: &str) -> String {
    match &state.presigner {
        Some(presigner) => presigner.display_url(key).await,
        None => key.to_string(),
    }
}

pub(crate) fn storage_unavailable() -> AppError {
    AppError::ServiceUnavailable("S3 is not configured".to_string())
}

/// Exact match against the configured origins, plus plain-http loopback
/// origins on any port when `allow_loopback` is set.
fn is_allowed_origin(origin: &str, configured: &[String], allow_loopback: bool) -> bool {
    if configured.iter().any(|o| o == origin) {
        return true;
    }
    if !allow_loopback {
        return false;
    }
    let Ok(url) = reqwest::Url::parse(origin) else {
        return false;
    };
    url.scheme() == "http"
        && matches!(url.host_str(), Some("localhost" | "127.0.0.1"))
        && url.username().is_empty()
        && url.path() == "/"
        && url.query().is_none()
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Configured origins, plus localhost outside production
    let origins = state.config.cors_origins.clone();
    let allow_loopback = !state.config.is_production();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                is_allowed_origin(origin.to_str().unwrap_or(""), &origins, allow_loopback)
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(crate::middleware::admin::ADMIN_KEY_HEADER),
        ]);

    // Admin ingestion (shared key)
    let admin_routes = ideas::routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_admin_key,
    ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/healthz", get(health_check))
        .merge(auth::routes())
        .merge(admin_routes);

    // Protected routes (session token required)
    let protected_routes = Router::new()
        .merge(me::routes())
        .merge(my_ideas::routes())
        .merge(feed::routes())
        .merge(swipes::routes())
        .merge(stats::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
