// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use vibecheck_api::config::Config;
use vibecheck_api::db::SqliteDb;
use vibecheck_api::models::{Idea, IdeaContent, IdeaStatus};
use vibecheck_api::routes::create_router;
use vibecheck_api::AppState;

#[allow(dead_code)]
pub const ADMIN_KEY: &str = "test_admin_key";

/// Create a test app over a fresh in-memory SQLite database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let db = SqliteDb::open_in_memory().expect("in-memory database");
    let state = Arc::new(AppState::new(config, Arc::new(db)).expect("app state"));
    (create_router(state.clone()), state)
}

/// Config with object storage pointed at a local path-style endpoint.
#[allow(dead_code)]
pub fn config_with_storage() -> Config {
    let mut config = Config::test_default();
    config.storage.bucket = Some("vibecheck-media".to_string());
    config.storage.endpoint = Some("http://127.0.0.1:9000/vibecheck-media".to_string());
    config.storage.access_key_id = Some("AKIDEXAMPLE".to_string());
    config.storage.secret_access_key = Some("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY".to_string());
    config
}

/// Create a user directly in storage and issue them a session token.
#[allow(dead_code)]
pub fn create_user(state: &AppState, subject: &str) -> (Uuid, String) {
    let user = state
        .db
        .upsert_user_by_auth("google", subject)
        .expect("create user");
    let token = state.tokens.issue(&user.id.to_string()).expect("issue token");
    (user.id, token)
}

#[allow(dead_code)]
pub fn idea_content(title: &str, category: &str) -> IdeaContent {
    IdeaContent {
        title: title.to_string(),
        short_pitch: format!("{title} pitch"),
        category: category.to_string(),
        media_url: "https://cdn.example.com/card.png".to_string(),
        one_liner: format!("{title} pitch"),
        stage: "idea".to_string(),
        ..IdeaContent::default()
    }
}

/// Insert an idea directly in storage.
#[allow(dead_code)]
pub fn seed_idea(
    state: &AppState,
    title: &str,
    category: &str,
    author_id: Option<Uuid>,
    status: IdeaStatus,
) -> Idea {
    state
        .db
        .create_idea(&idea_content(title, category), author_id, status)
        .expect("seed idea")
}

/// Send a request and return the status and parsed JSON body
/// (`Value::Null` for an empty body).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    (status, json)
}
