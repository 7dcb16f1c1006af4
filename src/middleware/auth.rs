// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-token authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// Authenticated user extracted from the session token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Middleware that requires a valid `Authorization: Bearer` session token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers().get(header::AUTHORIZATION))
        .ok_or(AppError::Unauthorized)?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| AppError::InvalidToken)?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        tracing::warn!(sub = %claims.sub, "Session token subject is not a user id");
        AppError::InvalidToken
    })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

/// The token from an `Authorization: Bearer <token>` header, if well formed.
pub fn extract_bearer_token(auth_header: Option<&HeaderValue>) -> Option<&str> {
    let token = auth_header?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_variants() {
        assert_eq!(extract_bearer_token(None), None);

        let basic = HeaderValue::from_static("Basic abc");
        assert_eq!(extract_bearer_token(Some(&basic)), None);

        let empty = HeaderValue::from_static("Bearer   ");
        assert_eq!(extract_bearer_token(Some(&empty)), None);

        let ok = HeaderValue::from_static("Bearer abc.def.ghi ");
        assert_eq!(extract_bearer_token(Some(&ok)), Some("abc.def.ghi"));
    }
}
