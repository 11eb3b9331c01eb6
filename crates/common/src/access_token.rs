//! Room access tokens.
//!
//! Access tokens are HS256 JWTs signed with the media server's API secret.
//! The layout follows what the media server expects from its own SDKs:
//!
//! - `iss`: API key
//! - `sub` / `jti`: participant identity
//! - `nbf` / `iat`: issuance time (Unix epoch seconds)
//! - `exp`: issuance time + TTL
//! - `video`: the [`VideoGrant`] capability set
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only HS256 is accepted on verification
//! - Verification errors are generic; details go to debug logs
//! - The identity is redacted in `Debug` output

use crate::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum token size accepted by [`verify_access_token`] (8KB).
///
/// A participant token is a few hundred bytes. Oversized input is rejected
/// before any base64 decoding or HMAC work.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Default token lifetime (6 hours).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Shortest configurable token lifetime (1 minute).
pub const MIN_TOKEN_TTL: Duration = Duration::from_secs(60);

/// Longest configurable token lifetime (24 hours).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

// =============================================================================
// Error Types
// =============================================================================

/// Errors from signing or verifying access tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessTokenError {
    /// The signing library rejected the claims or key.
    #[error("Access token signing failed: {0}")]
    Signing(String),

    /// Token exceeds [`MAX_TOKEN_SIZE_BYTES`].
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Signature, issuer, or validity window check failed.
    #[error("The access token is invalid or expired")]
    Invalid,
}

// =============================================================================
// Credentials
// =============================================================================

/// API key and secret pair used to sign tokens.
///
/// The secret is held as a [`SecretString`] so derived `Debug` output is safe.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    /// Public key identifier, emitted as the `iss` claim.
    pub api_key: String,

    /// HMAC secret shared with the media server.
    pub api_secret: SecretString,
}

impl ApiCredentials {
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }
}

// =============================================================================
// Claims Types
// =============================================================================

/// Room capabilities embedded in a token under the `video` claim.
///
/// Unset capabilities are omitted from the serialized token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_join: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_create: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_publish: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_subscribe: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_publish_data: Option<bool>,
}

impl VideoGrant {
    /// Full participant grant for `room`: join (creating the room if absent),
    /// publish audio/video, subscribe, and publish data.
    #[must_use]
    pub fn participant(room: impl Into<String>) -> Self {
        Self {
            room: Some(room.into()),
            room_join: Some(true),
            room_create: Some(true),
            can_publish: Some(true),
            can_subscribe: Some(true),
            can_publish_data: Some(true),
        }
    }

    /// True when the grant allows joining `room`.
    #[must_use]
    pub fn allows_join(&self, room: &str) -> bool {
        self.room_join == Some(true) && self.room.as_deref() == Some(room)
    }
}

/// Access token claims.
///
/// `sub` and `jti` carry the participant identity and are redacted in Debug.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub sub: String,
    pub jti: String,
    pub nbf: i64,
    pub iat: i64,
    pub exp: i64,

    /// Optional display name shown to other participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub video: VideoGrant,
}

impl fmt::Debug for AccessTokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenClaims")
            .field("iss", &self.iss)
            .field("sub", &"[REDACTED]")
            .field("jti", &"[REDACTED]")
            .field("nbf", &self.nbf)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("name", &self.name.as_ref().map(|_| "[REDACTED]"))
            .field("video", &self.video)
            .finish()
    }
}

impl AccessTokenClaims {
    /// Build claims for `identity`, valid from `issued_at` for `ttl`.
    #[must_use]
    pub fn new(
        api_key: &str,
        identity: &str,
        video: VideoGrant,
        issued_at: i64,
        ttl: Duration,
    ) -> Self {
        // TTL is bounded by MAX_TOKEN_TTL at configuration time
        #[allow(clippy::cast_possible_wrap)]
        let ttl_secs = ttl.as_secs() as i64;

        Self {
            iss: api_key.to_string(),
            sub: identity.to_string(),
            jti: identity.to_string(),
            nbf: issued_at,
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
            name: None,
            video,
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Participant identity (`sub`).
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.sub
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Sign `claims` with the API secret (HS256).
///
/// # Errors
///
/// Returns `AccessTokenError::Signing` if the signing library fails.
pub fn sign_access_token(
    claims: &AccessTokenClaims,
    credentials: &ApiCredentials,
) -> Result<String, AccessTokenError> {
    let encoding_key = EncodingKey::from_secret(credentials.api_secret.expose_secret().as_bytes());

    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, &encoding_key).map_err(|e| AccessTokenError::Signing(e.to_string()))
}

/// Verify a token against `credentials` and return its claims.
///
/// Checks size, HS256 signature, `exp`, `nbf`, and that `iss` equals the API key.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds [`MAX_TOKEN_SIZE_BYTES`]
/// - `Invalid` - any other verification failure
pub fn verify_access_token(
    token: &str,
    credentials: &ApiCredentials,
) -> Result<AccessTokenClaims, AccessTokenError> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            target: "common.access_token",
            token_size = token.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(AccessTokenError::TokenTooLarge);
    }

    let decoding_key = DecodingKey::from_secret(credentials.api_secret.expose_secret().as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_issuer(&[credentials.api_key.as_str()]);

    let token_data = decode::<AccessTokenClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "common.access_token", error = %e, "Token verification failed");
        AccessTokenError::Invalid
    })?;

    Ok(token_data.claims)
}
