//! The host half of host-does-IO: executing a core `HttpRequest`.
//!
//! `Transport` is the seam tests replace with a scripted fake. The production
//! `UreqTransport` runs ureq's blocking client on tokio's blocking pool.

use std::time::Duration;

use async_trait::async_trait;
use lead_core::{HttpRequest, HttpResponse, RelayError};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one round-trip. Non-2xx statuses are returned as data.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RelayError>;
}

/// ureq-backed transport.
///
/// The agent carries its own global timeout so the blocking thread is freed
/// even after the caller has stopped waiting.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RelayError> {
        let agent = self.agent.clone();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || send(&agent, timeout, request))
            .await
            .map_err(|e| RelayError::Transport(format!("relay task failed: {e}")))?
    }
}

fn send(
    agent: &ureq::Agent,
    timeout: Duration,
    request: HttpRequest,
) -> Result<HttpResponse, RelayError> {
    let mut builder = agent.post(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let mut response = builder
        .send(request.body.as_bytes())
        .map_err(|e| map_error(e, timeout))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| map_error(e, timeout))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn map_error(error: ureq::Error, timeout: Duration) -> RelayError {
    match error {
        ureq::Error::Timeout(_) => RelayError::Timeout(timeout),
        other => RelayError::Transport(other.to_string()),
    }
}
