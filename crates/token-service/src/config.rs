//! Token service configuration.
//!
//! Configuration is loaded from environment variables once at startup and
//! passed into the issuer explicitly. Empty values count as unset.

use common::access_token::{ApiCredentials, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL, MIN_TOKEN_TTL};
use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Default signaling URL handed to clients.
pub const DEFAULT_WS_URL: &str = "ws://localhost:7880";

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default graceful-shutdown drain period in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 0;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:3000").
    pub bind_address: String,

    /// Signaling URL returned alongside every token.
    pub ws_url: String,

    /// API key and secret. `None` when either variable is unset; see
    /// [`Config::require_credentials`].
    pub credentials: Option<ApiCredentials>,

    /// Lifetime of issued tokens.
    pub token_ttl: Duration,

    /// Browser origins allowed by CORS. Empty disables the CORS layer.
    pub allowed_origins: Vec<String>,

    /// Seconds to wait after a shutdown signal before exiting.
    pub drain_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing signing credentials: LIVEKIT_API_KEY and LIVEKIT_API_SECRET must both be set")]
    MissingCredentials,

    #[error("Invalid token TTL: {0}")]
    InvalidTtl(String),

    #[error("Invalid signaling URL: {0}")]
    InvalidWsUrl(String),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid allowed origin: {0}")]
    InvalidAllowedOrigin(String),

    #[error("Invalid drain period: {0}")]
    InvalidDrainSeconds(String),
}

fn non_empty<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    ///
    /// Missing credentials are not an error here; the issuer reports them
    /// per request and `main` refuses to start without them.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = non_empty(vars, "BIND_ADDRESS")
            .unwrap_or(DEFAULT_BIND_ADDRESS)
            .to_string();

        bind_address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddress(format!("{bind_address}: {e}")))?;

        let ws_url = non_empty(vars, "LIVEKIT_WS_URL")
            .unwrap_or(DEFAULT_WS_URL)
            .to_string();

        if !(ws_url.starts_with("ws://") || ws_url.starts_with("wss://")) {
            return Err(ConfigError::InvalidWsUrl(format!(
                "expected ws:// or wss:// scheme, got {ws_url}"
            )));
        }

        let credentials = match (
            non_empty(vars, "LIVEKIT_API_KEY"),
            vars.get("LIVEKIT_API_SECRET").filter(|v| !v.is_empty()),
        ) {
            (Some(key), Some(secret)) => Some(ApiCredentials::new(key, secret.as_str())),
            _ => None,
        };

        let token_ttl = match non_empty(vars, "TOKEN_TTL_SECONDS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    ConfigError::InvalidTtl(format!("TOKEN_TTL_SECONDS must be an integer: {e}"))
                })?;
                let ttl = Duration::from_secs(secs);
                if ttl < MIN_TOKEN_TTL || ttl > MAX_TOKEN_TTL {
                    return Err(ConfigError::InvalidTtl(format!(
                        "TOKEN_TTL_SECONDS must be between {} and {}, got {}",
                        MIN_TOKEN_TTL.as_secs(),
                        MAX_TOKEN_TTL.as_secs(),
                        secs
                    )));
                }
                ttl
            }
            None => DEFAULT_TOKEN_TTL,
        };

        let allowed_origins: Vec<String> = non_empty(vars, "ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        for origin in &allowed_origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::InvalidAllowedOrigin(origin.clone()));
            }
        }

        let drain_seconds = match non_empty(vars, "DRAIN_SECONDS") {
            Some(raw) => raw.parse().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!("DRAIN_SECONDS must be an integer: {e}"))
            })?,
            None => DEFAULT_DRAIN_SECONDS,
        };

        Ok(Config {
            bind_address,
            ws_url,
            credentials,
            token_ttl,
            allowed_origins,
            drain_seconds,
        })
    }

    /// Startup check: the process must not serve traffic without credentials.
    pub fn require_credentials(&self) -> Result<&ApiCredentials, ConfigError> {
        self.credentials
            .as_ref()
            .ok_or(ConfigError::MissingCredentials)
    }
}
