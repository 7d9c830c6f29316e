mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn me_returns_profile_without_hash() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.alice_token().await?;

    let res = server
        .client
        .get(server.url("/api/v1/users/me"))
        .bearer_auth(&alice)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["full_name"], "Alice Admin");
    assert_eq!(body["data"]["privilege"], 2);
    assert!(body["data"].get("hashed_password").is_none());
    Ok(())
}

#[tokio::test]
async fn list_never_exposes_digests() -> Result<()> {
    let server = common::spawn_server().await?;
    let bob = server.bob_token().await?;

    let res = server
        .client
        .get(server.url("/api/v1/users"))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    let users = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("hashed_password").is_none()));
    Ok(())
}

#[tokio::test]
async fn created_user_can_log_in() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.alice_token().await?;

    let new_user = json!({
        "id": 3,
        "username": "carol",
        "password": "carol-pw",
        "email": "carol@example.com"
    });
    let res = server
        .client
        .post(server.url("/api/v1/user"))
        .bearer_auth(&alice)
        .json(&new_user)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["privilege"], 1);

    // Duplicate username conflicts
    let duplicate = json!({"id": 4, "username": "carol", "password": "x"});
    let res = server
        .client
        .post(server.url("/api/v1/user"))
        .bearer_auth(&alice)
        .json(&duplicate)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    server.token("carol", "carol-pw").await?;
    Ok(())
}

#[tokio::test]
async fn read_only_user_cannot_create_users() -> Result<()> {
    let server = common::spawn_server().await?;
    let bob = server.bob_token().await?;

    let res = server
        .client
        .post(server.url("/api/v1/user"))
        .bearer_auth(&bob)
        .json(&json!({"id": 9, "username": "mallory", "password": "pw", "privilege": 2}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn replace_rehashes_password_and_keeps_other_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.alice_token().await?;

    let res = server
        .client
        .put(server.url("/api/v1/user/2"))
        .bearer_auth(&alice)
        .json(&json!({"password": "bob-new-pw"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["username"], "bob");

    let old = server.login("bob", common::BOB_PASSWORD).await?;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
    server.token("bob", "bob-new-pw").await?;

    let missing = server
        .client
        .put(server.url("/api/v1/user/99"))
        .bearer_auth(&alice)
        .json(&json!({"email": "x@example.com"}))
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn disabled_user_is_refused_by_me() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.alice_token().await?;
    let bob = server.bob_token().await?;

    let res = server
        .client
        .put(server.url("/api/v1/user/2"))
        .bearer_auth(&alice)
        .json(&json!({"disabled": true}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Bob's token is still valid, but the fresh lookup sees the flag
    let res = server
        .client
        .get(server.url("/api/v1/users/me"))
        .bearer_auth(&bob)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn passwords_past_the_bcrypt_limit_are_refused() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.alice_token().await?;
    let prefix = "p".repeat(72);

    let res = server
        .client
        .post(server.url("/api/v1/user"))
        .bearer_auth(&alice)
        .json(&json!({"id": 5, "username": "dana", "password": format!("{}one", prefix)}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // A 72-byte password is fine, and longer guesses sharing it do not log in
    let res = server
        .client
        .post(server.url("/api/v1/user"))
        .bearer_auth(&alice)
        .json(&json!({"id": 5, "username": "dana", "password": prefix}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let guess = server.login("dana", &format!("{}two", prefix)).await?;
    assert_eq!(guess.status(), StatusCode::UNAUTHORIZED);
    server.token("dana", &prefix).await?;
    Ok(())
}

#[tokio::test]
async fn incomplete_user_body_gets_json_error_body() -> Result<()> {
    let server = common::spawn_server().await?;
    let alice = server.alice_token().await?;

    let res = server
        .client
        .post(server.url("/api/v1/user"))
        .bearer_auth(&alice)
        .json(&json!({"username": "x"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
