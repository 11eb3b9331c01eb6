//! Deterministic configuration fixtures for testing
//!
//! Fixed API credentials so tests can verify the tokens the service issues.

use common::access_token::ApiCredentials;
use std::collections::HashMap;
use token_service::config::{Config, ConfigError};

/// API key used by every test configuration.
pub const TEST_API_KEY: &str = "APItest0001";

/// API secret used by every test configuration.
pub const TEST_API_SECRET: &str = "test-secret-0001-do-not-use-in-production";

/// Signaling URL used by test configurations.
pub const TEST_WS_URL: &str = "ws://media.test:7880";

/// Credentials matching [`TEST_API_KEY`] / [`TEST_API_SECRET`].
pub fn test_credentials() -> ApiCredentials {
    ApiCredentials::new(TEST_API_KEY, TEST_API_SECRET)
}

/// Environment for a fully configured test service.
pub fn test_vars() -> HashMap<String, String> {
    HashMap::from([
        ("LIVEKIT_API_KEY".to_string(), TEST_API_KEY.to_string()),
        ("LIVEKIT_API_SECRET".to_string(), TEST_API_SECRET.to_string()),
        ("LIVEKIT_WS_URL".to_string(), TEST_WS_URL.to_string()),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
    ])
}

/// Fully configured test service.
pub fn test_config() -> Result<Config, ConfigError> {
    Config::from_vars(&test_vars())
}

/// Test service with the API secret unset.
pub fn test_config_without_secret() -> Result<Config, ConfigError> {
    let mut vars = test_vars();
    vars.remove("LIVEKIT_API_SECRET");
    Config::from_vars(&vars)
}
