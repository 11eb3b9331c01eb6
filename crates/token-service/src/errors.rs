use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenServiceError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Signing credentials are not configured")]
    MissingCredentials,

    #[error("Token signing failed: {0}")]
    SigningFailure(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl TokenServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TokenServiceError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            TokenServiceError::MissingCredentials | TokenServiceError::SigningFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the caller. Never carries internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            TokenServiceError::MissingParameter(_) => "Missing required parameters: room and name",
            TokenServiceError::MissingCredentials => "Server is not configured to issue tokens",
            TokenServiceError::SigningFailure(_) => "Failed to generate token",
        }
    }
}

impl IntoResponse for TokenServiceError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.public_message().to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
