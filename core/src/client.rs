//! Stateless request builder and response parser for Follow Up Boss.
//!
//! # Design
//! `FubClient` holds the base URL, the precomputed Basic credential and the
//! integration name. Relaying a lead is split into `build_create_event`, which
//! produces an `HttpRequest`, and `parse_create_event`, which consumes an
//! `HttpResponse`. The host executes the round-trip in between and owns the
//! timeout, keeping this crate free of I/O.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::RelayError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{FubEvent, RelayReceipt};

pub const DEFAULT_BASE_URL: &str = "https://api.followupboss.com";
const EVENTS_PATH: &str = "/v1/events";

/// Client for the Follow Up Boss events API.
#[derive(Clone)]
pub struct FubClient {
    base_url: String,
    authorization: String,
    system: String,
}

impl FubClient {
    /// `api_key` becomes the Basic username; the password is left empty.
    pub fn new(base_url: &str, api_key: &str, system: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: basic_auth(api_key),
            system: system.to_string(),
        }
    }

    pub fn events_url(&self) -> String {
        format!("{}{EVENTS_PATH}", self.base_url)
    }

    pub fn build_create_event(&self, event: &FubEvent) -> Result<HttpRequest, RelayError> {
        let body =
            serde_json::to_string(event).map_err(|e| RelayError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: self.events_url(),
            headers: vec![
                ("authorization".to_string(), self.authorization.clone()),
                ("content-type".to_string(), "application/json".to_string()),
                ("x-system".to_string(), self.system.clone()),
            ],
            body,
        })
    }

    /// 200 and 201 carry the matched or created person; 204 means a lead flow
    /// accepted the event without creating anyone. The person id is only read
    /// from a body that is JSON, or that comes without a `content-type`.
    pub fn parse_create_event(&self, response: HttpResponse) -> Result<RelayReceipt, RelayError> {
        match response.status {
            200 | 201 | 204 => Ok(RelayReceipt {
                status: response.status,
                person_id: is_json(&response)
                    .then(|| person_id(&response.body))
                    .flatten(),
            }),
            status => Err(RelayError::HttpStatus {
                status,
                body: response.body,
            }),
        }
    }
}

impl fmt::Debug for FubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FubClient")
            .field("base_url", &self.base_url)
            .field("authorization", &"<redacted>")
            .field("system", &self.system)
            .finish()
    }
}

/// `Basic base64("<api key>:")`.
pub fn basic_auth(api_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{api_key}:")))
}

#[derive(Deserialize)]
struct CreatedPerson {
    id: Option<i64>,
}

fn is_json(response: &HttpResponse) -> bool {
    response
        .header("content-type")
        .map_or(true, |value| value.to_ascii_lowercase().contains("json"))
}

fn person_id(body: &str) -> Option<i64> {
    serde_json::from_str::<CreatedPerson>(body).ok()?.id
}
