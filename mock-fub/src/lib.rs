use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub source: String,
    pub system: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub page_url: Option<String>,
    pub occurred_at: Option<String>,
    pub person: Person,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub stage: String,
    pub emails: Vec<Contact>,
    pub phones: Vec<Contact>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    pub value: String,
}

/// Canned answer replacing the normal 201 for every following request.
#[derive(Clone, Debug)]
pub struct Failure {
    pub status: u16,
    pub body: String,
}

/// Shared state of one mock Follow Up Boss instance.
///
/// Clones share the same recorded events, so a test can keep a handle while
/// the server runs on another task.
#[derive(Clone)]
pub struct MockFub {
    authorization: Arc<str>,
    hits: Arc<AtomicUsize>,
    events: Arc<RwLock<Vec<Event>>>,
    failure: Arc<RwLock<Option<Failure>>>,
    delay: Arc<RwLock<Duration>>,
}

impl MockFub {
    pub fn new(api_key: &str) -> Self {
        Self {
            authorization: format!("Basic {}", STANDARD.encode(format!("{api_key}:"))).into(),
            hits: Arc::new(AtomicUsize::new(0)),
            events: Arc::new(RwLock::new(Vec::new())),
            failure: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Number of requests that reached `/v1/events`, accepted or not.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Events accepted so far, in arrival order.
    pub async fn events(&self) -> Vec<Event> {
        self.events.read().await.clone()
    }

    pub async fn fail_with(&self, status: u16, body: &str) {
        *self.failure.write().await = Some(Failure {
            status,
            body: body.to_string(),
        });
    }

    /// Hold every following request for `delay` before answering.
    pub async fn stall_for(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }
}

pub fn app(fub: MockFub) -> Router {
    Router::new()
        .route("/v1/events", post(create_event))
        .with_state(fub)
}

pub async fn run(listener: TcpListener, fub: MockFub) -> Result<(), std::io::Error> {
    axum::serve(listener, app(fub)).await
}

async fn create_event(
    State(fub): State<MockFub>,
    headers: HeaderMap,
    Json(event): Json<Event>,
) -> Response {
    fub.hits.fetch_add(1, Ordering::SeqCst);

    let delay = *fub.delay.read().await;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == &*fub.authorization);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "errorMessage": "Access denied" })),
        )
            .into_response();
    }

    if let Some(failure) = fub.failure.read().await.clone() {
        let status = StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, failure.body).into_response();
    }

    let mut events = fub.events.write().await;
    events.push(event.clone());
    let id = events.len() as i64;
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": id,
            "firstName": event.person.first_name,
            "lastName": event.person.last_name,
            "stage": event.person.stage,
            "tags": event.person.tags,
        })),
    )
        .into_response()
}
