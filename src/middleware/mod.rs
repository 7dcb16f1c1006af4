// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, admin key, security headers).

pub mod admin;
pub mod auth;
pub mod security;

pub use admin::require_admin_key;
pub use auth::{require_auth, AuthUser};
