//! Deterministic mapping from a validated lead to a Follow Up Boss event.
//!
//! Given the same `ValidatedLead` and `SiteIdentity`, `normalize` always
//! produces byte-identical tags and note text. Nothing here reads a clock or
//! generates ids; the only timestamp is the one the browser supplied.

use crate::types::{ContactValue, FubEvent, FubPerson, LeadSubmission, Utm};
use crate::validate::ValidatedLead;

pub const EVENT_TYPE: &str = "Registration";
pub const LEAD_STAGE: &str = "Lead";
const UNSPECIFIED_TIMELINE: &str = "unspecified";

/// How this deployment names itself to the CRM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    /// Site identifier, used as the fixed tag and the default event source.
    pub site: String,
    /// Integration name sent as the event `system`.
    pub system: String,
}

pub fn normalize(lead: &ValidatedLead, identity: &SiteIdentity) -> FubEvent {
    let lead = lead.submission();
    let source = if lead.source.is_empty() {
        identity.site.clone()
    } else {
        lead.source.clone()
    };

    FubEvent {
        source,
        system: identity.system.clone(),
        kind: EVENT_TYPE.to_string(),
        message: note(lead),
        page_url: non_empty(&lead.page_url),
        occurred_at: non_empty(&lead.submitted_at),
        person: FubPerson {
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            stage: LEAD_STAGE.to_string(),
            emails: contact_list(&lead.email),
            phones: contact_list(&lead.phone),
            tags: tags(lead, identity),
        },
    }
}

/// Site tag, timeline, optional area, then one `utm_<key>=<value>` per
/// non-empty UTM field.
pub fn tags(lead: &LeadSubmission, identity: &SiteIdentity) -> Vec<String> {
    let timeline = if lead.timeline.is_empty() {
        UNSPECIFIED_TIMELINE
    } else {
        lead.timeline.as_str()
    };

    let mut tags = vec![identity.site.clone(), format!("Timeline: {timeline}")];
    if !lead.area.is_empty() {
        tags.push(format!("Area: {}", lead.area));
    }
    tags.extend(filled(&lead.utm).map(|(key, value)| format!("utm_{key}={value}")));
    tags
}

/// One line per non-empty segment: message, area, SMS opt-in, submission
/// time, UTM summary. Blank lines inside the message are dropped.
pub fn note(lead: &LeadSubmission) -> String {
    let mut lines: Vec<String> = lead
        .message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if !lead.area.is_empty() {
        lines.push(format!("Preferred area: {}", lead.area));
    }
    let opt_in = if lead.sms_opt_in { "yes" } else { "no" };
    lines.push(format!("SMS opt-in: {opt_in}"));
    if !lead.submitted_at.is_empty() {
        lines.push(format!("Submitted at: {}", lead.submitted_at));
    }
    let utm: Vec<String> = filled(&lead.utm)
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    if !utm.is_empty() {
        lines.push(format!("UTM: {}", utm.join(", ")));
    }
    lines.join("\n")
}

fn filled(utm: &Utm) -> impl Iterator<Item = (&'static str, &str)> {
    utm.pairs().into_iter().filter(|(_, value)| !value.is_empty())
}

fn contact_list(value: &str) -> Vec<ContactValue> {
    if value.is_empty() {
        Vec::new()
    } else {
        vec![ContactValue {
            value: value.to_string(),
        }]
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    fn identity() -> SiteIdentity {
        SiteIdentity {
            site: "FromStart2Keys.com".to_string(),
            system: "FromStart2Keys".to_string(),
        }
    }

    fn ana() -> LeadSubmission {
        LeadSubmission {
            first_name: "Ana".to_string(),
            last_name: "Lee".to_string(),
            email: "ana@example.com".to_string(),
            area: "Tacoma".to_string(),
            timeline: "0-3 months".to_string(),
            ..Default::default()
        }
    }

    fn event_for(submission: LeadSubmission) -> FubEvent {
        normalize(&validate(submission).unwrap(), &identity())
    }

    #[test]
    fn ana_lee_maps_to_expected_event() {
        let event = event_for(ana());
        assert_eq!(event.source, "FromStart2Keys.com");
        assert_eq!(event.system, "FromStart2Keys");
        assert_eq!(event.kind, "Registration");
        assert_eq!(event.person.first_name, "Ana");
        assert_eq!(event.person.last_name, "Lee");
        assert_eq!(event.person.stage, "Lead");
        assert_eq!(
            event.person.emails,
            vec![ContactValue { value: "ana@example.com".to_string() }]
        );
        assert!(event.person.phones.is_empty());
        assert_eq!(
            event.person.tags,
            vec!["FromStart2Keys.com", "Timeline: 0-3 months", "Area: Tacoma"]
        );
        assert_eq!(event.message, "Preferred area: Tacoma\nSMS opt-in: no");
        assert_eq!(event.page_url, None);
        assert_eq!(event.occurred_at, None);
    }

    #[test]
    fn missing_timeline_is_tagged_unspecified() {
        let mut submission = ana();
        submission.timeline = String::new();
        submission.area = String::new();
        let event = event_for(submission);
        assert_eq!(
            event.person.tags,
            vec!["FromStart2Keys.com", "Timeline: unspecified"]
        );
    }

    #[test]
    fn only_non_empty_utm_fields_become_tags() {
        let mut submission = ana();
        submission.utm = Utm {
            source: "google".to_string(),
            medium: String::new(),
            campaign: "spring".to_string(),
            content: String::new(),
            term: "homes tacoma".to_string(),
        };
        let event = event_for(submission);
        let utm_tags: Vec<&str> = event
            .person
            .tags
            .iter()
            .map(String::as_str)
            .filter(|tag| tag.starts_with("utm_"))
            .collect();
        assert_eq!(
            utm_tags,
            vec!["utm_source=google", "utm_campaign=spring", "utm_term=homes tacoma"]
        );
        assert!(!event.person.tags.iter().any(|tag| tag.ends_with('=')));
    }

    #[test]
    fn whitespace_utm_values_are_dropped() {
        let mut submission = ana();
        submission.utm.medium = "   ".to_string();
        let event = event_for(submission);
        assert!(!event.person.tags.iter().any(|tag| tag.starts_with("utm_medium")));
        assert!(!event.message.contains("UTM:"));
    }

    #[test]
    fn full_note_keeps_segment_order() {
        let submission = LeadSubmission {
            message: "Need a yard".to_string(),
            sms_opt_in: true,
            submitted_at: "2024-05-01T10:00:00.000Z".to_string(),
            utm: Utm {
                source: "facebook".to_string(),
                medium: "paid".to_string(),
                ..Default::default()
            },
            ..ana()
        };
        let event = event_for(submission);
        assert_eq!(
            event.message,
            "Need a yard\n\
             Preferred area: Tacoma\n\
             SMS opt-in: yes\n\
             Submitted at: 2024-05-01T10:00:00.000Z\n\
             UTM: source=facebook, medium=paid"
        );
        assert_eq!(event.occurred_at.as_deref(), Some("2024-05-01T10:00:00.000Z"));
    }

    #[test]
    fn note_never_contains_blank_lines() {
        let sparse = LeadSubmission {
            phone: "253-555-0100".to_string(),
            message: "  ".to_string(),
            ..Default::default()
        };
        let note = event_for(sparse).message;
        assert_eq!(note, "SMS opt-in: no");
        assert!(!note.contains("\n\n"));
        assert!(!note.starts_with('\n') && !note.ends_with('\n'));
    }

    #[test]
    fn multi_paragraph_message_is_collapsed() {
        let submission = LeadSubmission {
            email: "ana@example.com".to_string(),
            message: "Hi there\n\nThanks\r\n  \r\n  Ana  ".to_string(),
            ..Default::default()
        };
        let note = event_for(submission).message;
        assert_eq!(note, "Hi there\nThanks\nAna\nSMS opt-in: no");
        assert!(!note.contains("\n\n"));
    }

    #[test]
    fn phone_only_lead_has_empty_email_list() {
        let submission = LeadSubmission {
            phone: "253-555-0100".to_string(),
            ..Default::default()
        };
        let event = event_for(submission);
        assert!(event.person.emails.is_empty());
        assert_eq!(event.person.phones[0].value, "253-555-0100");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["person"]["emails"], serde_json::json!([]));
    }

    #[test]
    fn submitted_source_overrides_site_identifier() {
        let mut submission = ana();
        submission.source = "Landing-B".to_string();
        let event = event_for(submission);
        assert_eq!(event.source, "Landing-B");
        assert_eq!(event.person.tags[0], "FromStart2Keys.com");
    }

    #[test]
    fn normalization_is_deterministic() {
        let mut submission = ana();
        submission.message = "Hello".to_string();
        submission.utm.source = "google".to_string();
        let lead = validate(submission).unwrap();
        let first = serde_json::to_string(&normalize(&lead, &identity())).unwrap();
        for _ in 0..10 {
            let again = serde_json::to_string(&normalize(&lead, &identity())).unwrap();
            assert_eq!(again, first);
        }
    }
}
