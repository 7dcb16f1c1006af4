// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod oidc;
pub mod storage;
pub mod tokens;
pub mod usecases;

pub use oidc::{IdTokenClaims, OidcError, OidcVerifier};
pub use storage::{PresignError, PresignedPut, S3Presigner};
pub use tokens::{Claims, SessionTokens, TokenError};
pub use usecases::{get_next_idea, login_with_subject, record_swipe, SwipeError};
