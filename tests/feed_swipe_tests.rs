// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed, swipe and swipe statistics tests.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;
use vibecheck_api::models::IdeaStatus;

mod common;
use common::{create_test_app, create_user, seed_idea, send};

#[tokio::test]
async fn test_feed_serves_newest_unseen_then_null() {
    let (app, state) = create_test_app();
    let (_, token) = create_user(&state, "swiper");
    let older = seed_idea(&state, "Older", "fintech", None, IdeaStatus::Published);
    let newer = seed_idea(&state, "Newer", "health", None, IdeaStatus::Published);

    let (status, card) = send(&app, Method::GET, "/feed/next", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["id"], newer.id.to_string());
    assert_eq!(card["title"], "Newer");
    assert_eq!(card["media"], json!([]));
    assert!(card.get("status").is_none());

    let (status, _) = send(
        &app,
        Method::POST,
        "/swipes",
        Some(&token),
        Some(json!({"idea_id": newer.id, "direction": "vibe"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, card) = send(&app, Method::GET, "/feed/next", Some(&token), None).await;
    assert_eq!(card["id"], older.id.to_string());

    send(
        &app,
        Method::POST,
        "/swipes",
        Some(&token),
        Some(json!({"idea_id": older.id, "direction": "no_vibe"})),
    )
    .await;

    let (status, card) = send(&app, Method::GET, "/feed/next", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(card.is_null());
}

#[tokio::test]
async fn test_feed_skips_drafts_and_own_ideas() {
    let (app, state) = create_test_app();
    let (me, token) = create_user(&state, "author");
    let (other, _) = create_user(&state, "someone-else");
    seed_idea(&state, "My own", "ai", Some(me), IdeaStatus::Published);
    seed_idea(&state, "Their draft", "ai", Some(other), IdeaStatus::Draft);

    let (_, card) = send(&app, Method::GET, "/feed/next", Some(&token), None).await;
    assert!(card.is_null());

    let theirs = seed_idea(&state, "Their pitch", "ai", Some(other), IdeaStatus::Published);
    let (_, card) = send(&app, Method::GET, "/feed/next", Some(&token), None).await;
    assert_eq!(card["id"], theirs.id.to_string());
}

#[tokio::test]
async fn test_swipe_response_shape() {
    let (app, state) = create_test_app();
    let (user_id, token) = create_user(&state, "swiper");
    let idea = seed_idea(&state, "Pitch", "fintech", None, IdeaStatus::Published);

    let (status, swipe) = send(
        &app,
        Method::POST,
        "/swipes",
        Some(&token),
        Some(json!({"idea_id": idea.id, "direction": "no_vibe", "decision_time_ms": 1200})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(swipe["user_id"], user_id.to_string());
    assert_eq!(swipe["idea_id"], idea.id.to_string());
    assert_eq!(swipe["direction"], "no_vibe");
    assert_eq!(swipe["decision_time_ms"], 1200);
    assert!(Uuid::parse_str(swipe["id"].as_str().unwrap()).is_ok());
    assert!(swipe["created_at"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_duplicate_swipe_conflicts() {
    let (app, state) = create_test_app();
    let (_, token) = create_user(&state, "swiper");
    let idea = seed_idea(&state, "Pitch", "fintech", None, IdeaStatus::Published);
    let body = json!({"idea_id": idea.id, "direction": "vibe"});

    let (first, _) = send(&app, Method::POST, "/swipes", Some(&token), Some(body.clone())).await;
    let (second, err) = send(&app, Method::POST, "/swipes", Some(&token), Some(body)).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(err["details"], "Swipe already recorded");

    let (_, stats) = send(&app, Method::GET, "/stats/me", Some(&token), None).await;
    assert_eq!(stats["total_swipes"], 1);
}

#[tokio::test]
async fn test_invalid_swipes_rejected() {
    let (app, state) = create_test_app();
    let (_, token) = create_user(&state, "swiper");
    let idea = seed_idea(&state, "Pitch", "fintech", None, IdeaStatus::Published);

    let (status, err) = send(
        &app,
        Method::POST,
        "/swipes",
        Some(&token),
        Some(json!({"idea_id": idea.id, "direction": "maybe"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["details"], "Invalid swipe direction");

    let (status, _) = send(
        &app,
        Method::POST,
        "/swipes",
        Some(&token),
        Some(json!({"idea_id": idea.id, "direction": "vibe", "decision_time_ms": -5})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Rejected swipes leave nothing behind
    let (status, _) = send(
        &app,
        Method::POST,
        "/swipes",
        Some(&token),
        Some(json!({"idea_id": idea.id, "direction": "vibe"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_swipe_on_missing_idea_not_found() {
    let (app, state) = create_test_app();
    let (_, token) = create_user(&state, "swiper");

    let (status, err) = send(
        &app,
        Method::POST,
        "/swipes",
        Some(&token),
        Some(json!({"idea_id": Uuid::new_v4(), "direction": "vibe"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["details"], "Idea not found");
}

#[tokio::test]
async fn test_swipe_by_unknown_user_not_found() {
    let (app, state) = create_test_app();
    let idea = seed_idea(&state, "Pitch", "fintech", None, IdeaStatus::Published);
    let token = state.tokens.issue(&Uuid::new_v4().to_string()).unwrap();

    let (status, err) = send(
        &app,
        Method::POST,
        "/swipes",
        Some(&token),
        Some(json!({"idea_id": idea.id, "direction": "vibe"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["details"], "User not found");
}

#[tokio::test]
async fn test_my_swipe_stats_by_category() {
    let (app, state) = create_test_app();
    let (_, token) = create_user(&state, "swiper");
    let swipes = [
        ("fintech", "vibe"),
        ("fintech", "no_vibe"),
        ("fintech", "vibe"),
        ("health", "no_vibe"),
    ];
    for (i, (category, direction)) in swipes.iter().enumerate() {
        let idea = seed_idea(
            &state,
            &format!("Idea {i}"),
            category,
            None,
            IdeaStatus::Published,
        );
        send(
            &app,
            Method::POST,
            "/swipes",
            Some(&token),
            Some(json!({"idea_id": idea.id, "direction": direction})),
        )
        .await;
    }

    let (status, stats) = send(&app, Method::GET, "/stats/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_swipes"], 4);
    assert_eq!(stats["total_vibes"], 2);
    assert_eq!(stats["total_no_vibes"], 2);
    assert_eq!(stats["vibe_rate"], 50.0);
    assert_eq!(
        stats["by_category"],
        json!([
            {"category": "fintech", "total": 3, "vibes": 2, "no_vibes": 1, "vibe_rate": 66.7},
            {"category": "health", "total": 1, "vibes": 0, "no_vibes": 1, "vibe_rate": 0.0},
        ])
    );
}

#[tokio::test]
async fn test_my_swipe_stats_empty() {
    let (app, state) = create_test_app();
    let (_, token) = create_user(&state, "newcomer");

    let (status, stats) = send(&app, Method::GET, "/stats/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "total_swipes": 0,
            "total_vibes": 0,
            "total_no_vibes": 0,
            "vibe_rate": 0.0,
            "by_category": [],
        })
    );
}
