//! I/O-free core of the lead intake service.
//!
//! # Overview
//! Turns an untrusted landing-page submission into a Follow Up Boss event and
//! describes the CRM call as plain data (host-does-IO pattern). The host
//! executes the HTTP round-trip, so everything here is deterministic and
//! testable without a network.
//!
//! # Design
//! - `validate` is the only way to get a `ValidatedLead`; it enforces that a
//!   lead carries an email or a phone number.
//! - `normalize` maps a `ValidatedLead` to a `FubEvent` with no hidden inputs.
//! - `FubClient` splits the relay into `build_create_event` and
//!   `parse_create_event`, so the I/O boundary is explicit.
//! - DTOs are defined independently from the mock-fub crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod normalize;
pub mod types;
pub mod validate;

pub use client::FubClient;
pub use error::{RelayError, ValidationError};
pub use http::{HttpRequest, HttpResponse};
pub use normalize::{normalize, SiteIdentity};
pub use types::{ContactValue, FubEvent, FubPerson, LeadSubmission, RelayReceipt, Utm};
pub use validate::{validate, ValidatedLead};
