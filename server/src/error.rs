use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lead_core::{RelayError, ValidationError};
use thiserror::Error;

/// Everything that can stop a lead from being acknowledged.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Deployment is missing something it needs, e.g. the CRM key.
    #[error("Server misconfigured: {0}")]
    Configuration(String),

    /// Follow Up Boss refused the lead or could not be reached. Only surfaced
    /// as an error under the strict relay policy.
    #[error("relay to Follow Up Boss failed: {0}")]
    Upstream(RelayError),

    /// Details stay in the logs; the caller gets a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RelayError> for LeadError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Serialization(msg) => LeadError::Internal(msg),
            other => LeadError::Upstream(other),
        }
    }
}

impl LeadError {
    pub fn status(&self) -> StatusCode {
        match self {
            LeadError::Validation(_) => StatusCode::BAD_REQUEST,
            LeadError::Configuration(_) | LeadError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            LeadError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for LeadError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            LeadError::Validation(err) => serde_json::json!({ "error": err.to_string() }),
            LeadError::Configuration(_) => serde_json::json!({ "error": self.to_string() }),
            LeadError::Upstream(err) => serde_json::json!({
                "error": upstream_summary(err),
                "details": err.details(),
            }),
            LeadError::Internal(_) => serde_json::json!({ "error": "Server error" }),
        };
        (status, Json(body)).into_response()
    }
}

/// One-line caller-facing description of a relay failure.
pub fn upstream_summary(err: &RelayError) -> String {
    match err {
        RelayError::HttpStatus { status, .. } => {
            format!("Follow Up Boss rejected the lead (HTTP {status})")
        }
        RelayError::Timeout(_) => "Follow Up Boss did not respond in time".to_string(),
        RelayError::Transport(_) => "Could not reach Follow Up Boss".to_string(),
        RelayError::Serialization(_) => "Could not encode the lead".to_string(),
    }
}
