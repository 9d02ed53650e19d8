use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Paid plan level. SMS is a premium feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Standard,
    Premium,
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Standard
    }
}

/// The wedding event a household is invited to. Read-only to this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_date: NaiveDate,
    pub tier: Tier,
}

/// A guest-list unit with one shared contact channel. Read-only to this
/// service; arrives joined onto due reminders together with its event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: ID,
    pub household_name: Option<String>,
    pub phone_e164: Option<String>,
    pub email: Option<String>,
    pub sms_opt_out: bool,
    /// Tri-state RSVP: attending, declined, or not yet answered
    pub rsvp_attending: Option<bool>,
    pub event: Option<Event>,
}

impl Household {
    pub fn display_name(&self) -> &str {
        match self.household_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "there",
        }
    }

    /// Phone number usable as an SMS destination, if any
    pub fn contact_phone(&self) -> Option<&str> {
        self.phone_e164.as_deref().filter(|p| !p.is_empty())
    }

    /// Email address usable as a destination, if any
    pub fn contact_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }

    /// Whether any notification channel can reach this household at all
    pub fn has_contact_info(&self) -> bool {
        self.contact_phone().is_some() || self.contact_email().is_some()
    }

    pub fn has_responded(&self) -> bool {
        self.rsvp_attending.is_some()
    }
}

impl Entity<ID> for Household {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household() -> Household {
        Household {
            id: ID::new(),
            household_name: None,
            phone_e164: None,
            email: None,
            sms_opt_out: false,
            rsvp_attending: None,
            event: None,
        }
    }

    #[test]
    fn empty_contact_fields_count_as_unreachable() {
        let mut h = household();
        assert!(!h.has_contact_info());

        h.phone_e164 = Some("".into());
        h.email = Some("".into());
        assert!(!h.has_contact_info());
        assert!(h.contact_phone().is_none());
        assert!(h.contact_email().is_none());

        h.phone_e164 = Some("+4712345678".into());
        assert!(h.has_contact_info());
    }

    #[test]
    fn display_name_falls_back_for_missing_or_empty_name() {
        let mut h = household();
        assert_eq!(h.display_name(), "there");
        h.household_name = Some("".into());
        assert_eq!(h.display_name(), "there");
        h.household_name = Some("The Does".into());
        assert_eq!(h.display_name(), "The Does");
    }
}
