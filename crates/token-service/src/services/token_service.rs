use crate::config::Config;
use crate::errors::TokenServiceError;
use crate::models::{TokenRequest, TokenResponse};
use crate::observability::hash_for_correlation;
use chrono::Utc;
use common::access_token::{
    sign_access_token, AccessTokenClaims, AccessTokenError, ApiCredentials, VideoGrant,
};
use std::time::Duration;
use tracing::instrument;

/// Issues room access tokens.
///
/// Stateless apart from the configuration it is built with; shared across
/// request handlers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    credentials: Option<ApiCredentials>,
    ws_url: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        Self {
            credentials: config.credentials.clone(),
            ws_url: config.ws_url.clone(),
            ttl: config.token_ttl,
        }
    }

    /// Whether signing credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Signaling URL returned with every token.
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Issue a token for `request` at the current time.
    pub fn issue(&self, request: &TokenRequest) -> Result<TokenResponse, TokenServiceError> {
        self.issue_at(request, Utc::now().timestamp())
    }

    /// Issue a token for `request` as of `issued_at` (Unix epoch seconds).
    #[instrument(skip_all, fields(
        room_hash = %hash_for_correlation(&request.room),
        identity_hash = %hash_for_correlation(&request.identity),
    ))]
    pub fn issue_at(
        &self,
        request: &TokenRequest,
        issued_at: i64,
    ) -> Result<TokenResponse, TokenServiceError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            tracing::error!(
                target: "token.issuer",
                "Token requested but LIVEKIT_API_KEY/LIVEKIT_API_SECRET are not configured"
            );
            TokenServiceError::MissingCredentials
        })?;

        let claims = AccessTokenClaims::new(
            &credentials.api_key,
            &request.identity,
            VideoGrant::participant(request.room.as_str()),
            issued_at,
            self.ttl,
        );

        let token = sign_access_token(&claims, credentials).map_err(signing_failure)?;

        tracing::info!(
            target: "token.issuer",
            expires_at = claims.exp,
            "Issued room access token"
        );

        Ok(TokenResponse {
            token,
            ws_url: self.ws_url.clone(),
        })
    }
}

/// Detail goes to the log; the caller only sees the generic message.
fn signing_failure(err: AccessTokenError) -> TokenServiceError {
    tracing::error!(target: "token.issuer", error = %err, "Failed to sign access token");
    TokenServiceError::SigningFailure(err.to_string())
}
