//! End-to-end tests for `GET /api/token`
//!
//! Each test spawns a real server on a random port and talks to it over HTTP.

use common::access_token::{verify_access_token, DEFAULT_TOKEN_TTL};
use reqwest::StatusCode;
use token_service::config::Config;
use token_test_utils::{
    test_config, test_config_without_secret, test_credentials, test_vars, TestTokenServer,
    TokenAssertions, TEST_API_KEY, TEST_WS_URL,
};

// ============================================================================
// Successful issuance
// ============================================================================

#[tokio::test]
async fn test_issue_token_returns_token_and_ws_url() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestTokenServer::spawn(test_config()?).await?;

    // Act
    let response = reqwest::get(server.token_url("team-sync", "alice")?).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["wsUrl"].as_str(), Some(TEST_WS_URL));

    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("response has no token"))?;
    token
        .assert_valid_jwt()
        .assert_for_identity("alice")
        .assert_issued_by(TEST_API_KEY)
        .assert_participant_grant("team-sync")
        .assert_expires_in(DEFAULT_TOKEN_TTL.as_secs());

    Ok(())
}

#[tokio::test]
async fn test_issued_token_verifies_with_api_secret() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let body: serde_json::Value = reqwest::get(server.token_url("team-sync", "alice")?)
        .await?
        .json()
        .await?;
    let token = body["token"].as_str().unwrap_or_default();

    let claims = verify_access_token(token, &test_credentials())?;
    assert_eq!(claims.identity(), "alice");
    assert_eq!(claims.jti, "alice");
    assert!(claims.video.allows_join("team-sync"));
    assert!(!claims.video.allows_join("other-room"));

    Ok(())
}

#[tokio::test]
async fn test_different_participants_get_distinct_tokens() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let mut tokens = Vec::new();
    for name in ["alice", "bob"] {
        let body: serde_json::Value = reqwest::get(server.token_url("team-sync", name)?)
            .await?
            .json()
            .await?;
        let token = body["token"].as_str().unwrap_or_default().to_string();
        token.as_str().assert_for_identity(name);
        tokens.push(token);
    }

    assert_ne!(tokens[0], tokens[1]);

    Ok(())
}

#[tokio::test]
async fn test_username_is_accepted_for_name() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::get(format!(
        "{}/api/token?room=team-sync&username=carol",
        server.url()
    ))
    .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    body["token"]
        .as_str()
        .unwrap_or_default()
        .assert_for_identity("carol");

    Ok(())
}

#[tokio::test]
async fn test_repeated_parameters_use_first_value() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::get(format!(
        "{}/api/token?room=team-sync&room=other&name=alice&username=a&username=b",
        server.url()
    ))
    .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    body["token"]
        .as_str()
        .unwrap_or_default()
        .assert_for_identity("alice")
        .assert_participant_grant("team-sync");

    Ok(())
}

#[tokio::test]
async fn test_percent_encoded_values_are_decoded()-> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::get(server.token_url("sala de reunião", "José & Ana")?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    body["token"]
        .as_str()
        .unwrap_or_default()
        .assert_for_identity("José & Ana")
        .assert_participant_grant("sala de reunião");

    Ok(())
}

#[tokio::test]
async fn test_configured_ttl_is_applied() -> Result<(), anyhow::Error> {
    let mut vars = test_vars();
    vars.insert("TOKEN_TTL_SECONDS".to_string(), "600".to_string());
    let server = TestTokenServer::spawn(Config::from_vars(&vars)?).await?;

    let body: serde_json::Value = reqwest::get(server.token_url("team-sync", "alice")?)
        .await?
        .json()
        .await?;
    body["token"]
        .as_str()
        .unwrap_or_default()
        .assert_expires_in(600);

    Ok(())
}

// ============================================================================
// Rejected requests
// ============================================================================

#[tokio::test]
async fn test_missing_name_returns_400() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::get(format!("{}/api/token?room=team-sync", server.url())).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body["error"].as_str(),
        Some("Missing required parameters: room and name")
    );
    assert!(body.get("token").is_none());

    Ok(())
}

#[tokio::test]
async fn test_missing_room_returns_400() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::get(format!("{}/api/token?name=alice", server.url())).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_blank_values_are_treated_as_missing() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::get(server.token_url("team-sync", "   ")?).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_missing_secret_returns_500() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config_without_secret()?).await?;

    let response = reqwest::get(server.token_url("team-sync", "alice")?).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body["error"].as_str(),
        Some("Server is not configured to issue tokens")
    );
    assert!(body.get("token").is_none());

    Ok(())
}

#[tokio::test]
async fn test_validation_runs_before_credential_check() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config_without_secret()?).await?;

    let response = reqwest::get(format!("{}/api/token?room=team-sync", server.url())).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_post_is_not_allowed() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::Client::new()
        .post(server.token_url("team-sync", "alice")?)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
