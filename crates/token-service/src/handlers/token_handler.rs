//! Token endpoint handler.
//!
//! - `GET /api/token?room=<room>&name=<identity>` (`username` accepted for `name`)
//!
//! Returns `{ "token": ..., "wsUrl": ... }` on success and `{ "error": ... }`
//! otherwise. Validation errors are returned before any signing work.

use crate::errors::TokenServiceError;
use crate::models::{TokenQuery, TokenRequest, TokenResponse};
use crate::observability::metrics::record_token_issuance;
use crate::observability::ErrorCategory;
use crate::routes::AppState;
use axum::{
    extract::{RawQuery, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handle a token request
///
/// GET /api/token
#[instrument(skip_all, name = "token.handlers.issue")]
pub async fn handle_issue_token(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<TokenResponse>, TokenServiceError> {
    let start = Instant::now();
    let result = issue(&state, query.as_deref().unwrap_or_default());

    let category = result.as_ref().err().map(ErrorCategory::from);
    record_token_issuance(category, start.elapsed());

    if let Err(e) = &result {
        if category == Some(ErrorCategory::Client) {
            tracing::debug!(target: "token.handlers", error = %e, "Rejected token request");
        }
    }

    result.map(Json)
}

fn issue(state: &AppState, raw_query: &str) -> Result<TokenResponse, TokenServiceError> {
    let request = TokenRequest::from_query(TokenQuery::parse(raw_query))?;

    state.issuer.issue(&request)
}
