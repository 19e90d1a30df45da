//! Authentication and authorization integration tests.
//!
//! Verifies the gateway's contract surface: 401 for missing/invalid
//! tokens, 403 for role and ownership violations, 404 for unknown live
//! classes, 400 for missing/malformed publish bodies, and that `/health`
//! stays public.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use serde_json::{json, Value};
use signaling_test_utils::{
    TestSignalingServer, TestTokenBuilder, CLASS_ID, EDUCATOR_ID, STUDENT_A,
};

fn class_url(server: &TestSignalingServer, tail: &str) -> String {
    format!("{}/api/v1/live-classes/{}/{}", server.url(), CLASS_ID, tail)
}

async fn spawn_seeded() -> Result<TestSignalingServer> {
    let server = TestSignalingServer::spawn().await?;
    server.seed_default_class();
    Ok(server)
}

#[tokio::test]
async fn health_is_public() -> Result<()> {
    let server = spawn_seeded().await?;
    let response = reqwest::get(format!("{}/health", server.url())).await?;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["resident_sessions"], 0);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();

    let response = client.get(class_url(&server, "offer")).send().await?;
    assert_eq!(response.status().as_u16(), 401);
    assert!(response.headers().get("WWW-Authenticate").is_some());
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();

    let response = client
        .get(class_url(&server, "offer"))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 401);
    Ok(())
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_unauthorized() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let forged = TestTokenBuilder::admin("admin-1")
        .signed_with("attacker-secret")
        .build();

    let response = client
        .get(class_url(&server, "offer"))
        .bearer_auth(&forged)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 401);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let expired = TestTokenBuilder::student(STUDENT_A).expires_in(-7200).build();

    let response = client
        .get(class_url(&server, "offer"))
        .bearer_auth(&expired)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 401);
    Ok(())
}

#[tokio::test]
async fn student_cannot_publish_offer() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let student = TestTokenBuilder::student(STUDENT_A).build();

    let response = client
        .post(class_url(&server, "offer"))
        .bearer_auth(&student)
        .json(&json!({ "offer": { "sdp": "O1" } }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 403);
    Ok(())
}

#[tokio::test]
async fn non_owning_educator_cannot_publish_offer_or_fetch_answer() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let other_educator = TestTokenBuilder::educator("educator-2").build();

    let response = client
        .post(class_url(&server, "offer"))
        .bearer_auth(&other_educator)
        .json(&json!({ "offer": { "sdp": "O1" } }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .get(class_url(&server, "answer"))
        .bearer_auth(&other_educator)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 403);
    Ok(())
}

#[tokio::test]
async fn student_cannot_fetch_answer() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let student = TestTokenBuilder::student(STUDENT_A).build();

    let response = client
        .get(class_url(&server, "answer"))
        .bearer_auth(&student)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 403);
    Ok(())
}

#[tokio::test]
async fn outsider_cannot_poll_or_publish() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let outsider = TestTokenBuilder::student("student-z").build();

    let response = client
        .get(class_url(&server, "offer"))
        .bearer_auth(&outsider)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .post(class_url(&server, "ice-candidate"))
        .bearer_auth(&outsider)
        .json(&json!({ "candidate": { "c": 1 } }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 403);
    Ok(())
}

#[tokio::test]
async fn admin_bypasses_ownership_and_enrollment() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let admin = TestTokenBuilder::admin("admin-1").build();

    let response = client
        .post(class_url(&server, "offer"))
        .bearer_auth(&admin)
        .json(&json!({ "offer": { "sdp": "O1" } }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .get(class_url(&server, "answer"))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 200);
    Ok(())
}

#[tokio::test]
async fn unknown_live_class_is_not_found() -> Result<()> {
    let server = TestSignalingServer::spawn().await?;
    let client = reqwest::Client::new();
    let educator = TestTokenBuilder::educator(EDUCATOR_ID).build();

    let response = client
        .post(format!(
            "{}/api/v1/live-classes/live-404/offer",
            server.url()
        ))
        .bearer_auth(&educator)
        .json(&json!({ "offer": { "sdp": "O1" } }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 404);

    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_publish_body_is_bad_request() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let educator = TestTokenBuilder::educator(EDUCATOR_ID).build();

    // Wrong field name.
    let response = client
        .post(class_url(&server, "offer"))
        .bearer_auth(&educator)
        .json(&json!({ "sdp": "O1" }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    // Explicit null payload.
    let response = client
        .post(class_url(&server, "offer"))
        .bearer_auth(&educator)
        .json(&json!({ "offer": null }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    // Not JSON at all.
    let response = client
        .post(class_url(&server, "offer"))
        .bearer_auth(&educator)
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn rejected_publish_leaves_no_partial_state() -> Result<()> {
    let server = spawn_seeded().await?;
    let client = reqwest::Client::new();
    let educator = TestTokenBuilder::educator(EDUCATOR_ID).build();

    client
        .post(class_url(&server, "offer"))
        .bearer_auth(&educator)
        .json(&json!({ "offer": null }))
        .send()
        .await?;

    // The rejected write created no session.
    assert_eq!(server.store().session_count(), 0);
    Ok(())
}
