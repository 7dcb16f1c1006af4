// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin ingestion tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use vibecheck_api::config::Config;

mod common;
use common::{create_test_app, create_test_app_with, create_user, send, ADMIN_KEY};

fn seed_body() -> Value {
    json!({
        "title": "Dog walking marketplace",
        "short_pitch": "Uber for dog walkers",
        "category": "marketplace",
        "media_url": "https://cdn.example.com/dogs.png",
        "tags": ["pets"],
    })
}

async fn post_idea(
    app: &axum::Router,
    admin_key: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/ideas")
        .header("content-type", "application/json");
    if let Some(key) = admin_key {
        builder = builder.header("x-admin-key", key);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_ingest_requires_admin_key() {
    let (app, _) = create_test_app();

    let (status, err) = post_idea(&app, None, seed_body()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["details"], "Invalid admin key");

    let (status, err) = post_idea(&app, Some("wrong"), seed_body()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["details"], "Invalid admin key");
}

#[tokio::test]
async fn test_ingest_disabled_without_configured_key() {
    let mut config = Config::test_default();
    config.admin_api_key = None;
    let (app, _) = create_test_app_with(config);

    let (status, err) = post_idea(&app, Some(ADMIN_KEY), seed_body()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["details"], "Admin ingestion is disabled");
}

#[tokio::test]
async fn test_ingested_idea_is_published_to_feed() {
    let (app, state) = create_test_app();
    let (_, token) = create_user(&state, "swiper");

    let (status, idea) = post_idea(&app, Some(ADMIN_KEY), seed_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(idea["one_liner"], "Uber for dog walkers");
    assert_eq!(idea["stage"], "idea");
    assert!(idea["created_at"].is_string());
    assert!(idea.get("status").is_none());

    let (_, card) = send(&app, axum::http::Method::GET, "/feed/next", Some(&token), None).await;
    assert_eq!(card["id"], idea["id"]);
    assert_eq!(card["media_url"], "https://cdn.example.com/dogs.png");
}

#[tokio::test]
async fn test_ingest_validation() {
    let (app, _) = create_test_app();

    let mut short_media = seed_body();
    short_media["media_url"] = json!("x.png");
    let mut long_problem = seed_body();
    long_problem["problem"] = json!("p".repeat(241));

    for body in [short_media, long_problem] {
        let (status, err) = post_idea(&app, Some(ADMIN_KEY), body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err["error"], "validation_error");
    }
}
