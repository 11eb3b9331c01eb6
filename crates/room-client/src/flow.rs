//! Room view join flow.
//!
//! Ties the join state, the token client and the engine together for one
//! room view. Dropping the flow releases any open session.

use crate::client::TokenClient;
use crate::errors::ClientError;
use crate::join::JoinRequest;
use crate::session::{RealtimeEngine, RoomSession};
use crate::state::JoinState;
use std::sync::Arc;

pub struct JoinFlow<E: RealtimeEngine> {
    room: String,
    client: TokenClient,
    engine: Arc<E>,
    state: JoinState,
    session: Option<RoomSession<E>>,
}

impl<E: RealtimeEngine> JoinFlow<E> {
    pub fn new(room: impl Into<String>, client: TokenClient, engine: Arc<E>) -> Self {
        Self {
            room: room.into(),
            client,
            engine,
            state: JoinState::Idle,
            session: None,
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn state(&self) -> &JoinState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(RoomSession::is_connected)
    }

    /// Join the room as `name`.
    ///
    /// A blank name is rejected without touching the state. Otherwise the
    /// flow moves to `Connecting`, fetches a token, connects, and ends in
    /// `Connected` or `Failed` with a message for the user. A failed attempt
    /// can be retried by submitting again.
    ///
    /// # Errors
    ///
    /// - `MissingParameter` - blank name
    /// - `InvalidTransition` - an attempt is in flight or already connected
    /// - any token or engine error, after the state records it
    pub async fn submit(&mut self, name: &str) -> Result<(), ClientError> {
        let request = JoinRequest::new(&self.room, name)?;
        self.state.begin()?;

        match self.open_session(&request).await {
            Ok(session) => {
                self.session = Some(session);
                self.state.succeed()
            }
            Err(e) => {
                tracing::warn!(target: "room_client.flow", error = %e, "Join attempt failed");
                self.state.fail(e.user_message())?;
                Err(e)
            }
        }
    }

    /// Leave the room and return to `Idle`.
    pub fn leave(&mut self) {
        self.session = None;
        self.state.reset();
    }

    // The session is dropped, and so disconnected, if connect fails.
    async fn open_session(&self, request: &JoinRequest) -> Result<RoomSession<E>, ClientError> {
        let grant = self.client.fetch_token(request).await?;

        let mut session = RoomSession::new(Arc::clone(&self.engine));
        session.connect(&grant).await?;
        Ok(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::mock::MockEngine;
    use serde_json::json;
    use wiremock::matchers::{path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn token_service() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(path("/api/token"))
            .and(query_param("room", "team-sync"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "header.payload.signature",
                "wsUrl": "ws://media.test:7880",
            })))
            .mount(&server)
            .await;
        server
    }

    fn flow(server: &MockServer, engine: &Arc<MockEngine>) -> JoinFlow<MockEngine> {
        JoinFlow::new(
            "team-sync",
            TokenClient::new(&server.uri()).unwrap(),
            Arc::clone(engine),
        )
    }

    #[tokio::test]
    async fn test_submit_connects() {
        let server = token_service().await;
        let engine = Arc::new(MockEngine::connecting());
        let mut flow = flow(&server, &engine);

        flow.submit("  alice ").await.unwrap();

        assert_eq!(flow.state(), &JoinState::Connected);
        assert!(flow.is_connected());
        assert_eq!(engine.connect_count(), 1);
        assert_eq!(
            engine.last_connection().map(|(ws_url, _)| ws_url),
            Some("ws://media.test:7880".to_string())
        );
    }

    #[tokio::test]
    async fn test_blank_name_leaves_state_unchanged() {
        let server = token_service().await;
        let engine = Arc::new(MockEngine::connecting());
        let mut flow = flow(&server, &engine);

        let err = flow.submit("   ").await.unwrap_err();

        assert!(matches!(err, ClientError::MissingParameter("name")));
        assert_eq!(flow.state(), &JoinState::Idle);
        assert_eq!(engine.connect_count(), 0);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_error_is_shown_and_retryable() {
        let server = MockServer::start().await;
        Mock::given(path("/api/token"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Failed to generate token",
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "header.payload.signature",
                "wsUrl": "ws://media.test:7880",
            })))
            .mount(&server)
            .await;

        let engine = Arc::new(MockEngine::connecting());
        let mut flow = flow(&server, &engine);

        assert!(flow.submit("alice").await.is_err());
        assert_eq!(flow.state().error_message(), Some("Failed to generate token"));
        assert!(flow.state().can_submit());
        assert_eq!(engine.connect_count(), 0);

        flow.submit("alice").await.unwrap();
        assert_eq!(flow.state(), &JoinState::Connected);
    }

    #[tokio::test]
    async fn test_connection_failure_releases_session() {
        let server = token_service().await;
        let engine = Arc::new(MockEngine::failing("camera permission denied"));
        let mut flow = flow(&server, &engine);

        let err = flow.submit("alice").await.unwrap_err();

        assert!(matches!(err, ClientError::ConnectionFailure(_)));
        assert_eq!(
            flow.state().error_message(),
            Some("Could not connect to the room: camera permission denied")
        );
        assert!(!flow.is_connected());
        assert_eq!(engine.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn test_repeated_failures_release_each_session_once() {
        let server = token_service().await;
        let engine = Arc::new(MockEngine::failing("camera permission denied"));
        let mut flow = flow(&server, &engine);

        assert!(flow.submit("alice").await.is_err());
        assert!(flow.submit("alice").await.is_err());

        assert_eq!(engine.connect_count(), 2);
        assert_eq!(engine.disconnect_count(), 2);

        drop(flow);
        assert_eq!(engine.disconnect_count(), 2);
    }

    #[tokio::test]
    async fn test_rejoin_after_leave_releases_only_the_old_session() {
        let server = token_service().await;
        let engine = Arc::new(MockEngine::connecting());
        let mut flow = flow(&server, &engine);

        flow.submit("alice").await.unwrap();
        flow.leave();
        flow.submit("alice").await.unwrap();

        assert!(flow.is_connected());
        assert_eq!(engine.connect_count(), 2);
        assert_eq!(engine.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_while_connected_is_rejected() {
        let server = token_service().await;
        let engine = Arc::new(MockEngine::connecting());
        let mut flow = flow(&server, &engine);
        flow.submit("alice").await.unwrap();

        let err = flow.submit("alice").await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidTransition { .. }));
        assert_eq!(flow.state(), &JoinState::Connected);
        assert_eq!(engine.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_leave_disconnects_and_resets() {
        let server = token_service().await;
        let engine = Arc::new(MockEngine::connecting());
        let mut flow = flow(&server, &engine);
        flow.submit("alice").await.unwrap();

        flow.leave();

        assert_eq!(flow.state(), &JoinState::Idle);
        assert!(!flow.is_connected());
        assert_eq!(engine.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn test_dropping_flow_disconnects() {
        let server = token_service().await;
        let engine = Arc::new(MockEngine::connecting());
        {
            let mut flow = flow(&server, &engine);
            flow.submit("alice").await.unwrap();
        }
        assert_eq!(engine.disconnect_count(), 1);
    }
}
