//! Join attempt state machine.
//!
//! ```text
//! Idle ──begin──► Connecting ──succeed──► Connected
//!   ▲                 │
//!   │               fail
//!   │                 ▼
//!   └───reset──── Failed ──begin──► Connecting
//! ```
//!
//! `reset` returns to `Idle` from any state.

use crate::errors::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JoinState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Failed {
        message: String,
    },
}

impl JoinState {
    /// Start a join attempt. Allowed from `Idle` and `Failed` only.
    pub fn begin(&mut self) -> Result<(), ClientError> {
        match self {
            JoinState::Idle | JoinState::Failed { .. } => {
                *self = JoinState::Connecting;
                Ok(())
            }
            _ => Err(self.invalid("begin")),
        }
    }

    pub fn succeed(&mut self) -> Result<(), ClientError> {
        match self {
            JoinState::Connecting => {
                *self = JoinState::Connected;
                Ok(())
            }
            _ => Err(self.invalid("succeed")),
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), ClientError> {
        match self {
            JoinState::Connecting => {
                *self = JoinState::Failed {
                    message: message.into(),
                };
                Ok(())
            }
            _ => Err(self.invalid("fail")),
        }
    }

    pub fn reset(&mut self) {
        *self = JoinState::Idle;
    }

    /// Whether the join action is enabled. At most one attempt is in flight.
    pub fn can_submit(&self) -> bool {
        !matches!(self, JoinState::Connecting)
    }

    /// Inline error to show, if the last attempt failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            JoinState::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinState::Idle => "idle",
            JoinState::Connecting => "connecting",
            JoinState::Connected => "connected",
            JoinState::Failed { .. } => "failed",
        }
    }

    fn invalid(&self, action: &'static str) -> ClientError {
        ClientError::InvalidTransition {
            state: self.as_str(),
            action,
        }
    }
}
