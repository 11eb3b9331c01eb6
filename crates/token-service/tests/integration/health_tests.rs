//! Integration tests for the liveness and readiness checks

use reqwest::StatusCode;
use token_test_utils::{test_config, test_config_without_secret, TestTokenServer};

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

/// Liveness does not depend on credentials.
#[tokio::test]
async fn test_health_endpoint_ok_without_credentials() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config_without_secret()?).await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_returns_ok_when_configured() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config()?).await?;

    let response = reqwest::get(format!("{}/ready", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"].as_str(), Some("ready"));
    assert_eq!(body["credentials"].as_str(), Some("configured"));
    assert!(body.get("error").is_none());

    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_returns_503_without_credentials() -> Result<(), anyhow::Error> {
    let server = TestTokenServer::spawn(test_config_without_secret()?).await?;

    let response = reqwest::get(format!("{}/ready", server.url())).await?;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"].as_str(), Some("not_ready"));
    assert_eq!(body["credentials"].as_str(), Some("missing"));

    // Generic message only
    let error = body["error"].as_str().unwrap_or_default();
    assert!(!error.contains("LIVEKIT"));

    Ok(())
}
