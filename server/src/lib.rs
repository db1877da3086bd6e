//! HTTP host for the lead intake service.
//!
//! # Overview
//! Serves `POST /api/lead` for the landing page form. Each submission is
//! validated and normalized by `lead-core`, then relayed to Follow Up Boss
//! through a `Transport` under a bounded timeout. Nothing is stored; every
//! request starts from scratch.
//!
//! # Design
//! - `AppConfig` is built once and handed in at construction, so the router
//!   never reads the environment.
//! - The `FubClient` is prepared up front when an API key is configured; a
//!   missing key is reported per request as a 500 without any network call.
//! - `Transport` is a trait object so tests can count and script relay calls.

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;
pub mod transport;

use std::sync::Arc;

use axum::{routing::get, routing::post, Router};
use lead_core::FubClient;
use tokio::net::TcpListener;

pub use config::{AppConfig, ConfigError, RelayPolicy};
pub use error::LeadError;
pub use routes::LeadAck;
pub use telemetry::init_tracing;
pub use transport::{Transport, UreqTransport};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub fub: Option<FubClient>,
    pub transport: Arc<dyn Transport>,
}

impl AppState {
    pub fn new(config: AppConfig, transport: Arc<dyn Transport>) -> Self {
        let fub = config
            .fub_api_key
            .as_deref()
            .map(|key| FubClient::new(&config.fub_base_url, key, &config.fub_system));
        Self {
            config: Arc::new(config),
            fub,
            transport,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/lead",
            post(routes::submit_lead).fallback(routes::method_not_allowed),
        )
        .route("/health", get(routes::health))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
