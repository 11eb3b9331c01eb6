//! Token service client.

use crate::errors::ClientError;
use crate::join::JoinRequest;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt;

/// Token and signaling URL needed to connect to a room.
#[derive(Clone, Deserialize)]
pub struct RoomGrant {
    pub token: String,
    #[serde(rename = "wsUrl")]
    pub ws_url: String,
}

impl fmt::Debug for RoomGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomGrant")
            .field("token", &"[REDACTED]")
            .field("ws_url", &self.ws_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for `GET /api/token`.
#[derive(Debug, Clone)]
pub struct TokenClient {
    base_url: Url,
    http_client: Client,
}

impl TokenClient {
    /// Create a client for the token service at `base_url`.
    ///
    /// # Errors
    ///
    /// `ClientError::InvalidUrl` when `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(base_url, Client::new())
    }

    /// Create a client that reuses an existing HTTP client.
    ///
    /// # Errors
    ///
    /// `ClientError::InvalidUrl` when `base_url` does not parse.
    pub fn with_http_client(base_url: &str, http_client: Client) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            http_client,
        })
    }

    /// Token endpoint URL for `request`, query values percent-encoded.
    ///
    /// # Errors
    ///
    /// `ClientError::InvalidUrl` when the base URL cannot hold a path.
    pub fn token_url(&self, request: &JoinRequest) -> Result<Url, ClientError> {
        let mut url = self.base_url.join("/api/token")?;
        url.query_pairs_mut()
            .append_pair("room", request.room())
            .append_pair("name", request.name());
        Ok(url)
    }

    /// Fetch a token for `request`.
    ///
    /// # Errors
    ///
    /// - `TokenRequest` - non-2xx response; `message` is the service's
    ///   `error` field, or a status line when the body has none
    /// - `Http` - transport failure or unreadable success body
    pub async fn fetch_token(&self, request: &JoinRequest) -> Result<RoomGrant, ClientError> {
        let url = self.token_url(request)?;

        tracing::debug!(target: "room_client.token", room = %request.room(), "Requesting room token");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("Token request failed with {}", status.as_u16()));

            tracing::warn!(
                target: "room_client.token",
                status = status.as_u16(),
                "Token request rejected"
            );
            return Err(ClientError::TokenRequest {
                status: status.as_u16(),
                message,
            });
        }

        let grant = response.json::<RoomGrant>().await?;
        Ok(grant)
    }

    /// Get the base URL for the token service.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn alice() -> JoinRequest {
        JoinRequest::new("team-sync", "alice").unwrap()
    }

    #[test]
    fn test_token_url_encodes_query() {
        let client = TokenClient::new("http://localhost:3000").unwrap();
        let request = JoinRequest::new("sala de reunião", "José & Ana").unwrap();

        let url = client.token_url(&request).unwrap();

        assert_eq!(url.path(), "/api/token");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("room".to_string(), "sala de reunião".to_string()),
                ("name".to_string(), "José & Ana".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            TokenClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_grant_debug_redacts_token() {
        let grant = RoomGrant {
            token: "eyJhbGciOiJIUzI1NiJ9.secret.sig".to_string(),
            ws_url: "ws://localhost:7880".to_string(),
        };
        let debug = format!("{grant:?}");
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("ws://localhost:7880"));
    }

    #[tokio::test]
    async fn test_fetch_token_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/token"))
            .and(query_param("room", "team-sync"))
            .and(query_param("name", "alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "header.payload.signature",
                "wsUrl": "ws://media.test:7880",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TokenClient::new(&server.uri()).unwrap();
        let grant = client.fetch_token(&alice()).await.unwrap();

        assert_eq!(grant.token, "header.payload.signature");
        assert_eq!(grant.ws_url, "ws://media.test:7880");
    }

    #[tokio::test]
    async fn test_fetch_token_uses_service_error_message() {
        let server = MockServer::start().await;
        Mock::given(path("/api/token"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Server is not configured to issue tokens",
            })))
            .mount(&server)
            .await;

        let client = TokenClient::new(&server.uri()).unwrap();
        let err = client.fetch_token(&alice()).await.unwrap_err();

        match err {
            ClientError::TokenRequest { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Server is not configured to issue tokens");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_token_falls_back_to_status_message() {
        let server = MockServer::start().await;
        Mock::given(path("/api/token"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let client = TokenClient::new(&server.uri()).unwrap();
        let err = client.fetch_token(&alice()).await.unwrap_err();

        match err {
            ClientError::TokenRequest { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Token request failed with 502");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_token_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t" })))
            .mount(&server)
            .await;

        let client = TokenClient::new(&server.uri()).unwrap();
        let err = client.fetch_token(&alice()).await.unwrap_err();

        assert!(matches!(err, ClientError::Http(_)));
    }
}
