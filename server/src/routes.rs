//! `POST /api/lead`: parse, validate, normalize, relay, acknowledge.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use lead_core::{normalize, validate, LeadSubmission, RelayError, RelayReceipt, ValidatedLead};
use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::RelayPolicy;
use crate::error::LeadError;
use crate::AppState;

/// Success body. `sentToFub` is only ever `false` under the lenient policy.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeadAck {
    pub ok: bool,
    pub sent_to_fub: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fub_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fub_error: Option<String>,
}

impl LeadAck {
    fn delivered(receipt: RelayReceipt) -> Self {
        Self {
            ok: true,
            sent_to_fub: true,
            fub_status: Some(receipt.status),
            person_id: receipt.person_id,
            fub_error: None,
        }
    }

    fn undelivered(err: &RelayError) -> Self {
        Self {
            ok: true,
            sent_to_fub: false,
            fub_status: err.status(),
            person_id: None,
            fub_error: Some(err.details()),
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}

pub async fn submit_lead(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LeadAck>, LeadError> {
    let request_id = Uuid::new_v4();
    process(state, body)
        .instrument(info_span!("lead", %request_id))
        .await
        .map(Json)
}

async fn process(state: AppState, body: Bytes) -> Result<LeadAck, LeadError> {
    let submission = parse_submission(&body)?;
    let lead = validate(submission).inspect_err(|err| info!(%err, "lead rejected"))?;
    log_accepted(&lead);

    let Some(client) = state.fub.as_ref() else {
        error!("FUB_API_KEY is not set; lead cannot be relayed");
        return Err(LeadError::Configuration("FUB_API_KEY is not set".to_string()));
    };

    let event = normalize(&lead, &state.config.identity());
    let request = client.build_create_event(&event)?;

    let timeout = state.config.fub_timeout;
    let outcome = match tokio::time::timeout(timeout, state.transport.execute(request)).await {
        Ok(Ok(response)) => client.parse_create_event(response),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(RelayError::Timeout(timeout)),
    };

    match outcome {
        Ok(receipt) => {
            info!(
                status = receipt.status,
                person_id = ?receipt.person_id,
                "lead relayed to Follow Up Boss"
            );
            Ok(LeadAck::delivered(receipt))
        }
        Err(err) => {
            warn!(status = ?err.status(), body = %err.details(), "relay to Follow Up Boss failed");
            match state.config.relay_policy {
                RelayPolicy::Strict => Err(LeadError::Upstream(err)),
                RelayPolicy::Lenient => Ok(LeadAck::undelivered(&err)),
            }
        }
    }
}

/// An empty body reads as `{}`, so it fails validation rather than parsing.
fn parse_submission(body: &[u8]) -> Result<LeadSubmission, LeadError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(LeadSubmission::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        error!(%err, "could not parse lead payload");
        LeadError::Internal(format!("invalid lead payload: {err}"))
    })
}

fn log_accepted(lead: &ValidatedLead) {
    let submission = lead.submission();
    info!(
        area = %submission.area,
        timeline = %submission.timeline,
        sms_opt_in = submission.sms_opt_in,
        has_email = lead.has_email(),
        has_phone = lead.has_phone(),
        utm_source = %submission.utm.source,
        utm_medium = %submission.utm.medium,
        utm_campaign = %submission.utm.campaign,
        submitted_at = %submission.submitted_at,
        "lead received"
    );
}
