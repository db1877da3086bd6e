//! Boundary validation for lead submissions.
//!
//! Only one rule is enforced: a lead must leave at least one way to reach
//! them. Email and phone formats are deliberately not checked, and area and
//! timeline stay free text.

use crate::error::ValidationError;
use crate::types::{LeadSubmission, Utm};

/// A submission that passed validation, with every text field trimmed.
///
/// The only way to obtain one is `validate`, so holding a `ValidatedLead`
/// means at least one of `email` / `phone` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLead(LeadSubmission);

impl ValidatedLead {
    pub fn submission(&self) -> &LeadSubmission {
        &self.0
    }

    pub fn has_email(&self) -> bool {
        !self.0.email.is_empty()
    }

    pub fn has_phone(&self) -> bool {
        !self.0.phone.is_empty()
    }
}

/// Trim the submission and check that it carries a contact channel.
pub fn validate(submission: LeadSubmission) -> Result<ValidatedLead, ValidationError> {
    let lead = trimmed(submission);
    if lead.email.is_empty() && lead.phone.is_empty() {
        return Err(ValidationError::MissingContact);
    }
    Ok(ValidatedLead(lead))
}

fn trimmed(lead: LeadSubmission) -> LeadSubmission {
    LeadSubmission {
        first_name: trim(lead.first_name),
        last_name: trim(lead.last_name),
        email: trim(lead.email),
        phone: trim(lead.phone),
        area: trim(lead.area),
        timeline: trim(lead.timeline),
        message: trim(lead.message),
        sms_opt_in: lead.sms_opt_in,
        source: trim(lead.source),
        page_url: trim(lead.page_url),
        submitted_at: trim(lead.submitted_at),
        utm: Utm {
            source: trim(lead.utm.source),
            medium: trim(lead.utm.medium),
            campaign: trim(lead.utm.campaign),
            content: trim(lead.utm.content),
            term: trim(lead.utm.term),
        },
    }
}

fn trim(value: String) -> String {
    value.trim().to_string()
}
