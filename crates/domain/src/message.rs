use crate::household::{Event, Household};
use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

pub const REMINDER_EMAIL_SUBJECT: &str = "Event reminder";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Handed over to the email collaborator, not yet transmitted
    Queued,
    /// Accepted by the provider
    Sent,
    Failed,
}

/// Append-only audit record of one SMS dispatch attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub household_id: ID,
    pub reminder_step: i64,
    pub to_e164: String,
    pub body: String,
    pub status: MessageStatus,
    pub provider_message_id: Option<String>,
    pub error_message: Option<String>,
}

/// Append-only email queue entry. Inserting a `queued` row hands the
/// message to the email collaborator; transmission happens elsewhere.
/// Existence of a row for a (household, step) pair doubles as the
/// idempotency check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub household_id: ID,
    pub reminder_step: i64,
    pub to_email: String,
    pub subject: String,
    pub body: String,
    pub status: MessageStatus,
    pub provider_message_id: Option<String>,
    pub error_message: Option<String>,
}

/// Renders the reminder body used by both channels
pub fn reminder_message(household: &Household, event: &Event, reminder_step: i64) -> String {
    format!(
        "Hi {} - reminder ({}): your event is on {}. Please RSVP via your link.",
        household.display_name(),
        reminder_step,
        event.event_date.format("%Y-%m-%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::Tier;
    use chrono::NaiveDate;

    fn event() -> Event {
        Event {
            event_date: NaiveDate::from_ymd(2021, 6, 15),
            tier: Tier::Standard,
        }
    }

    #[test]
    fn renders_name_step_and_event_date() {
        let household = Household {
            id: ID::new(),
            household_name: Some("The Does".into()),
            phone_e164: None,
            email: None,
            sms_opt_out: false,
            rsvp_attending: None,
            event: None,
        };
        assert_eq!(
            reminder_message(&household, &event(), 21),
            "Hi The Does - reminder (21): your event is on 2021-06-15. Please RSVP via your link."
        );
    }

    #[test]
    fn falls_back_to_generic_greeting_without_a_name() {
        let household = Household {
            id: ID::new(),
            household_name: None,
            phone_e164: None,
            email: None,
            sms_opt_out: false,
            rsvp_attending: None,
            event: None,
        };
        let message = reminder_message(&household, &event(), 3);
        assert!(message.starts_with("Hi there - reminder (3):"));
    }
}
