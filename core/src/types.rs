//! Domain DTOs: the inbound lead form and the outbound Follow Up Boss event.
//!
//! # Design
//! `LeadSubmission` is untrusted input from a public form, so every field has
//! a default and tolerates both absence and JSON `null`. The Follow Up Boss
//! types mirror the mock-fub crate's schema but are defined independently;
//! integration tests catch any drift between the two.

use serde::{Deserialize, Deserializer, Serialize};

/// A lead form submission as posted by the landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadSubmission {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    /// Preferred location, free text.
    #[serde(deserialize_with = "null_as_default")]
    pub area: String,
    /// Buying timeline such as "0-3 months". Not checked against a fixed list.
    #[serde(deserialize_with = "null_as_default")]
    pub timeline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sms_opt_in: bool,
    /// Site the form was posted from, e.g. "FromStart2Keys.com".
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub submitted_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub utm: Utm,
}

/// Campaign attribution forwarded from the landing page query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Utm {
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub medium: String,
    #[serde(deserialize_with = "null_as_default")]
    pub campaign: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub term: String,
}

impl Utm {
    /// `(key, value)` pairs in canonical order, empty values included.
    pub fn pairs(&self) -> [(&'static str, &str); 5] {
        [
            ("source", self.source.as_str()),
            ("medium", self.medium.as_str()),
            ("campaign", self.campaign.as_str()),
            ("content", self.content.as_str()),
            ("term", self.term.as_str()),
        ]
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An event posted to Follow Up Boss' `/v1/events` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FubEvent {
    pub source: String,
    pub system: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-text note shown on the person's timeline.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<String>,
    pub person: FubPerson,
}

/// The person block of a `FubEvent`.
///
/// `emails` and `phones` are always serialized, as empty lists when the lead
/// did not supply that channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FubPerson {
    pub first_name: String,
    pub last_name: String,
    pub stage: String,
    pub emails: Vec<ContactValue>,
    pub phones: Vec<ContactValue>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactValue {
    pub value: String,
}

/// What Follow Up Boss told us after accepting an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    pub status: u16,
    /// Id of the created or matched person, when the response carried one.
    pub person_id: Option<i64>,
}
