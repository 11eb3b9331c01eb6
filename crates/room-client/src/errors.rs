use thiserror::Error;

/// Room client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Not a room route: {0}")]
    InvalidRoute(String),

    #[error("Invalid token service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Token request failed with status {status}: {message}")]
    TokenRequest { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not connect to room: {0}")]
    ConnectionFailure(String),

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl ClientError {
    /// Message suitable for showing inline next to the join form.
    ///
    /// Token service errors pass through verbatim; the service already keeps
    /// them generic.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::MissingParameter("name") => "Please enter your name.".to_string(),
            ClientError::MissingParameter(_) => "Please enter a room and your name.".to_string(),
            ClientError::TokenRequest { message, .. } => message.clone(),
            ClientError::Http(_) | ClientError::InvalidUrl(_) => {
                "Failed to fetch token".to_string()
            }
            ClientError::ConnectionFailure(reason) => {
                format!("Could not connect to the room: {reason}")
            }
            ClientError::InvalidRoute(_) | ClientError::InvalidTransition { .. } => {
                self.to_string()
            }
        }
    }
}
