use crate::errors::TokenServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

/// Query parameters of `GET /api/token`.
///
/// `username` is accepted as an alias for `name`.
#[derive(Debug, Default)]
pub struct TokenQuery {
    pub room: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
}

impl TokenQuery {
    /// Decode a raw query string. A repeated key keeps its first non-blank
    /// value; unknown keys are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut query = Self::default();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "room" => &mut query.room,
                "name" => &mut query.name,
                "username" => &mut query.username,
                _ => continue,
            };
            if slot.is_none() && !value.trim().is_empty() {
                *slot = Some(value.into_owned());
            }
        }

        query
    }
}

/// Validated token request: both fields are present and not blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub room: String,
    pub identity: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TokenRequest {
    pub fn new(room: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            identity: identity.into(),
        }
    }

    /// Validate a raw query. `name` wins over `username` when both are set.
    pub fn from_query(query: TokenQuery) -> Result<Self, TokenServiceError> {
        let room = present(query.room).ok_or(TokenServiceError::MissingParameter("room"))?;
        let identity = present(query.name)
            .or_else(|| present(query.username))
            .ok_or(TokenServiceError::MissingParameter("name"))?;

        Ok(Self { room, identity })
    }
}

/// Successful token response.
///
/// Debug is manually implemented: the token is a bearer credential.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(rename = "wsUrl")]
    pub ws_url: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .field("ws_url", &self.ws_url)
            .finish()
    }
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub credentials: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
