//! Real-time engine boundary and session lifetime.
//!
//! Media transport, track negotiation and signaling belong to the engine.
//! This module only guarantees that every session handed to the engine is
//! released exactly once, on every exit path.

use crate::client::RoomGrant;
use crate::errors::ClientError;
use std::sync::Arc;

/// Trait for the external real-time engine (enables mocking).
///
/// `disconnect` is synchronous so it can run from `Drop`; it must release
/// the signaling connection and any camera or microphone the engine holds.
#[async_trait::async_trait]
pub trait RealtimeEngine: Send + Sync {
    /// Connect to the room behind `ws_url` using `token`.
    async fn connect(&self, ws_url: &str, token: &str) -> Result<(), ClientError>;

    /// Leave the room and release media devices. Safe to call when not
    /// connected.
    fn disconnect(&self);
}

/// An engine connection scoped to a value.
///
/// Dropping the session disconnects the engine, whether or not `connect`
/// succeeded.
pub struct RoomSession<E: RealtimeEngine> {
    engine: Arc<E>,
    connected: bool,
}

impl<E: RealtimeEngine> RoomSession<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            connected: false,
        }
    }

    /// Hand the grant to the engine.
    ///
    /// # Errors
    ///
    /// Whatever the engine reports, typically `ConnectionFailure`.
    pub async fn connect(&mut self, grant: &RoomGrant) -> Result<(), ClientError> {
        self.engine.connect(&grant.ws_url, &grant.token).await?;
        self.connected = true;
        tracing::info!(target: "room_client.session", "Connected to room");
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl<E: RealtimeEngine> Drop for RoomSession<E> {
    fn drop(&mut self) {
        self.engine.disconnect();
        tracing::debug!(
            target: "room_client.session",
            was_connected = self.connected,
            "Room session released"
        );
    }
}

/// Mock engine module for testing.
///
/// This module provides a mock engine for use in tests.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock real-time engine that records calls.
    pub struct MockEngine {
        failure: Option<String>,
        connect_count: AtomicUsize,
        disconnect_count: AtomicUsize,
        last_connection: Mutex<Option<(String, String)>>,
    }

    impl MockEngine {
        /// Create a mock whose connections succeed.
        pub fn connecting() -> Self {
            Self {
                failure: None,
                connect_count: AtomicUsize::new(0),
                disconnect_count: AtomicUsize::new(0),
                last_connection: Mutex::new(None),
            }
        }

        /// Create a mock whose connections fail with `reason`.
        pub fn failing(reason: impl Into<String>) -> Self {
            Self {
                failure: Some(reason.into()),
                ..Self::connecting()
            }
        }

        pub fn connect_count(&self) -> usize {
            self.connect_count.load(Ordering::SeqCst)
        }

        pub fn disconnect_count(&self) -> usize {
            self.disconnect_count.load(Ordering::SeqCst)
        }

        /// `(ws_url, token)` from the most recent `connect`.
        pub fn last_connection(&self) -> Option<(String, String)> {
            self.last_connection
                .lock()
                .ok()
                .and_then(|guard| guard.clone())
        }
    }

    #[async_trait::async_trait]
    impl RealtimeEngine for MockEngine {
        async fn connect(&self, ws_url: &str, token: &str) -> Result<(), ClientError> {
            self.connect_count.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last_connection.lock() {
                *last = Some((ws_url.to_string(), token.to_string()));
            }

            match &self.failure {
                Some(reason) => Err(ClientError::ConnectionFailure(reason.clone())),
                None => Ok(()),
            }
        }

        fn disconnect(&self) {
            self.disconnect_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
