//! Custom test assertions for expressive tests
//!
//! Trait-based assertions over the structure of issued access tokens. These
//! decode without verifying the signature; use
//! `common::access_token::verify_access_token` for that.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JwtVideoGrant {
    pub room: Option<String>,
    pub room_join: Option<bool>,
    pub room_create: Option<bool>,
    pub can_publish: Option<bool>,
    pub can_subscribe: Option<bool>,
    pub can_publish_data: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub video: JwtVideoGrant,
}

fn decode_part<T: for<'de> Deserialize<'de>>(token: &str, index: usize, what: &str) -> T {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT has no {what} part"));
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT {what}: {e}"));
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("Failed to parse JWT {what}: {e}"))
}

fn claims(token: &str) -> JwtClaims {
    decode_part(token, 1, "payload")
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_identity("alice")
///     .assert_participant_grant("team-sync");
/// ```
pub trait TokenAssertions {
    /// Assert that the token is an HS256 JWT with the expected claim layout
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token is for the specified participant identity
    fn assert_for_identity(&self, identity: &str) -> &Self;

    /// Assert that the token was issued under the specified API key
    fn assert_issued_by(&self, api_key: &str) -> &Self;

    /// Assert that the token grants join, create, publish, subscribe and
    /// data publish for `room`
    fn assert_participant_grant(&self, room: &str) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: u64) -> &Self;
}

impl TokenAssertions for str {
    fn assert_valid_jwt(&self) -> &Self {
        let parts = self.split('.').count();
        assert_eq!(
            parts, 3,
            "JWT must have 3 parts (header.payload.signature), got {parts}"
        );

        let header: JwtHeader = decode_part(self, 0, "header");
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let _claims = claims(self);

        self
    }

    fn assert_for_identity(&self, identity: &str) -> &Self {
        let claims = claims(self);
        assert_eq!(
            claims.sub, identity,
            "Expected identity '{}', got '{}'",
            identity, claims.sub
        );
        self
    }

    fn assert_issued_by(&self, api_key: &str) -> &Self {
        let claims = claims(self);
        assert_eq!(
            claims.iss, api_key,
            "Expected issuer '{}', got '{}'",
            api_key, claims.iss
        );
        self
    }

    fn assert_participant_grant(&self, room: &str) -> &Self {
        let video = claims(self).video;
        assert_eq!(video.room.as_deref(), Some(room), "Grant is for wrong room");
        assert_eq!(video.room_join, Some(true), "Grant is missing roomJoin");
        assert_eq!(video.room_create, Some(true), "Grant is missing roomCreate");
        assert_eq!(video.can_publish, Some(true), "Grant is missing canPublish");
        assert_eq!(video.can_subscribe, Some(true), "Grant is missing canSubscribe");
        assert_eq!(
            video.can_publish_data,
            Some(true),
            "Grant is missing canPublishData"
        );
        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let claims = claims(self);
        let expires_in = claims.exp - chrono::Utc::now().timestamp();

        // 5-second tolerance for test execution time
        assert!(
            (expires_in - seconds as i64).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );
        self
    }
}
