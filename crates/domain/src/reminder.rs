use crate::household::Household;
use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// The fixed days-before-event checkpoints a reminder moves through, in
/// firing order.
pub const REMINDER_STEPS: [i64; 3] = [21, 10, 3];

/// Step advancement is a lookup, not arithmetic, so the terminal condition
/// stays explicit and the sequence stays tunable.
pub fn next_step(step: i64) -> Option<i64> {
    match step {
        21 => Some(10),
        10 => Some(3),
        _ => None,
    }
}

/// When the reminder for `days_before` fires: midnight UTC of the event
/// date minus the step offset. Anchoring to UTC midnight keeps the value
/// stable however many times it is recomputed.
pub fn next_reminder_at(event_date: NaiveDate, days_before: i64) -> DateTime<Utc> {
    Utc.from_utc_date(&event_date).and_hms(0, 0, 0) - Duration::days(days_before)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    /// Eligible for selection once due
    Active,
    /// Claimed by an invocation, in flight
    Processing,
    /// Terminal, never re-entered
    Completed,
}

/// One reminder sequence per household per event. Created by the
/// guest-import pipeline at step 21 and mutated only by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderState {
    pub id: ID,
    pub household_id: ID,
    pub reminder_step: i64,
    pub status: ReminderStatus,
    /// Non-null whenever status is `active` or `processing`
    pub next_reminder_at: Option<DateTime<Utc>>,
    /// Set on claim. A `processing` row whose claim is older than the
    /// lease timeout is due again.
    pub claimed_at: Option<DateTime<Utc>>,
}

impl ReminderState {
    /// Fresh reminder as the guest-import pipeline creates it: first step,
    /// due 21 days before the event.
    pub fn new(household_id: ID, event_date: NaiveDate) -> Self {
        Self {
            id: ID::new(),
            household_id,
            reminder_step: REMINDER_STEPS[0],
            status: ReminderStatus::Active,
            next_reminder_at: Some(next_reminder_at(event_date, REMINDER_STEPS[0])),
            claimed_at: None,
        }
    }
}

impl Entity<ID> for ReminderState {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

/// A due reminder with its household (and nested event) context, as the
/// store returns it in one round trip
#[derive(Debug, Clone)]
pub struct DueReminder {
    pub reminder: ReminderState,
    pub household: Option<Household>,
}

/// Outcome of one reminder within a dispatch batch
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDispatch {
    pub reminder_id: ID,
    pub sent: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_sequence_is_a_fixed_lookup() {
        assert_eq!(next_step(21), Some(10));
        assert_eq!(next_step(10), Some(3));
        assert_eq!(next_step(3), None);
        // Unknown steps terminate instead of regressing
        assert_eq!(next_step(7), None);
        assert_eq!(next_step(0), None);
    }

    #[test]
    fn steps_walk_strictly_downwards_to_terminal() {
        let mut step = REMINDER_STEPS[0];
        let mut seen = vec![step];
        while let Some(next) = next_step(step) {
            assert!(next < step);
            seen.push(next);
            step = next;
        }
        assert_eq!(seen, REMINDER_STEPS.to_vec());
    }

    #[test]
    fn reminder_time_is_utc_midnight_minus_offset() {
        let event_date = NaiveDate::from_ymd(2021, 6, 15);
        assert_eq!(
            next_reminder_at(event_date, 10),
            Utc.ymd(2021, 6, 5).and_hms(0, 0, 0)
        );
        assert_eq!(
            next_reminder_at(event_date, 21),
            Utc.ymd(2021, 5, 25).and_hms(0, 0, 0)
        );
        // Offsets cross month boundaries without drift
        assert_eq!(
            next_reminder_at(NaiveDate::from_ymd(2021, 1, 2), 3),
            Utc.ymd(2020, 12, 30).and_hms(0, 0, 0)
        );
    }

    #[test]
    fn new_reminder_starts_at_first_step_and_is_active() {
        let event_date = NaiveDate::from_ymd(2021, 6, 15);
        let reminder = ReminderState::new(ID::new(), event_date);
        assert_eq!(reminder.reminder_step, 21);
        assert_eq!(reminder.status, ReminderStatus::Active);
        assert_eq!(
            reminder.next_reminder_at,
            Some(next_reminder_at(event_date, 21))
        );
        assert!(reminder.claimed_at.is_none());
    }
}
