use chrono::{DateTime, Utc};
use eventprompt_domain::{ReminderDispatch, ReminderState, ReminderStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStateDTO {
    pub id: ID,
    pub household_id: ID,
    pub reminder_step: i64,
    pub status: ReminderStatus,
    pub next_reminder_at: Option<DateTime<Utc>>,
}

impl ReminderStateDTO {
    pub fn new(reminder: ReminderState) -> Self {
        Self {
            id: reminder.id,
            household_id: reminder.household_id,
            reminder_step: reminder.reminder_step,
            status: reminder.status,
            next_reminder_at: reminder.next_reminder_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDispatchDTO {
    pub reminder_id: ID,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReminderDispatchDTO {
    pub fn new(dispatch: ReminderDispatch) -> Self {
        Self {
            reminder_id: dispatch.reminder_id,
            sent: dispatch.sent,
            error: dispatch.error,
        }
    }
}
