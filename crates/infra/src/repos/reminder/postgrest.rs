use super::IReminderRepo;
use crate::repos::shared::postgrest::PostgrestClient;
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use eventprompt_domain::{
    DueReminder, Event, Household, ReminderState, ReminderStatus, Tier, ID,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

pub struct PostgrestReminderRepo {
    client: Arc<PostgrestClient>,
    processing_lease_secs: i64,
}

impl PostgrestReminderRepo {
    pub fn new(client: Arc<PostgrestClient>, processing_lease_secs: i64) -> Self {
        Self {
            client,
            processing_lease_secs,
        }
    }

    fn lease_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::seconds(self.processing_lease_secs)
    }
}

fn ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Deserialize)]
struct ReminderRaw {
    id: ID,
    household_id: ID,
    reminder_step: i64,
    status: ReminderStatus,
    next_reminder_at: Option<DateTime<Utc>>,
    claimed_at: Option<DateTime<Utc>>,
}

impl Into<ReminderState> for ReminderRaw {
    fn into(self) -> ReminderState {
        ReminderState {
            id: self.id,
            household_id: self.household_id,
            reminder_step: self.reminder_step,
            status: self.status,
            next_reminder_at: self.next_reminder_at,
            claimed_at: self.claimed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventRaw {
    event_date: NaiveDate,
    /// Stored as free text; anything but "premium" is the standard tier
    tier: Option<String>,
}

impl Into<Event> for EventRaw {
    fn into(self) -> Event {
        let tier = match self.tier.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("premium") => Tier::Premium,
            _ => Tier::Standard,
        };
        Event {
            event_date: self.event_date,
            tier,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HouseholdRaw {
    id: ID,
    household_name: Option<String>,
    phone_e164: Option<String>,
    email: Option<String>,
    sms_opt_out: Option<bool>,
    rsvp_attending: Option<bool>,
    events: Option<EventRaw>,
}

impl Into<Household> for HouseholdRaw {
    fn into(self) -> Household {
        Household {
            id: self.id,
            household_name: self.household_name,
            phone_e164: self.phone_e164,
            email: self.email,
            sms_opt_out: self.sms_opt_out.unwrap_or(false),
            rsvp_attending: self.rsvp_attending,
            event: self.events.map(|e| e.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DueReminderRaw {
    #[serde(flatten)]
    reminder: ReminderRaw,
    households: Option<HouseholdRaw>,
}

impl Into<DueReminder> for DueReminderRaw {
    fn into(self) -> DueReminder {
        DueReminder {
            reminder: self.reminder.into(),
            household: self.households.map(|h| h.into()),
        }
    }
}

/// Filter accepting due `active` rows plus `processing` rows whose claim
/// lease has expired
fn due_predicate(now: DateTime<Utc>, cutoff: DateTime<Utc>) -> String {
    format!(
        "or=(and(status.eq.active,next_reminder_at.lte.{}),and(status.eq.processing,claimed_at.lte.{}))",
        ts(now),
        ts(cutoff)
    )
}

#[async_trait::async_trait]
impl IReminderRepo for PostgrestReminderRepo {
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<DueReminder>> {
        let path = format!(
            "reminder_state?select=*,households(*,events(*))&{}&order=next_reminder_at.asc&limit={}",
            due_predicate(now, self.lease_cutoff(now)),
            limit
        );
        let rows: Vec<DueReminderRaw> = self.client.get(&path).await?;
        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn claim(&self, reminder_id: &ID, now: DateTime<Utc>) -> anyhow::Result<bool> {
        let cutoff = self.lease_cutoff(now);
        let path = format!(
            "reminder_state?id=eq.{}&or=(status.eq.active,and(status.eq.processing,claimed_at.lte.{}))",
            reminder_id,
            ts(cutoff)
        );
        let updated: Vec<ReminderRaw> = self
            .client
            .patch(
                &path,
                &json!({
                    "status": "processing",
                    "claimed_at": ts(now),
                }),
            )
            .await?;
        Ok(!updated.is_empty())
    }

    async fn release(&self, reminder_id: &ID) -> anyhow::Result<()> {
        let path = format!("reminder_state?id=eq.{}", reminder_id);
        let _: Vec<ReminderRaw> = self
            .client
            .patch(
                &path,
                &json!({
                    "status": "active",
                    "claimed_at": null,
                }),
            )
            .await?;
        Ok(())
    }

    async fn advance(
        &self,
        reminder_id: &ID,
        next_step: i64,
        next_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let path = format!("reminder_state?id=eq.{}", reminder_id);
        let _: Vec<ReminderRaw> = self
            .client
            .patch(
                &path,
                &json!({
                    "status": "active",
                    "reminder_step": next_step,
                    "next_reminder_at": ts(next_at),
                    "claimed_at": null,
                }),
            )
            .await?;
        Ok(())
    }

    async fn complete(&self, reminder_id: &ID) -> anyhow::Result<()> {
        let path = format!("reminder_state?id=eq.{}", reminder_id);
        let _: Vec<ReminderRaw> = self
            .client
            .patch(
                &path,
                &json!({
                    "status": "completed",
                    "next_reminder_at": null,
                    "claimed_at": null,
                }),
            )
            .await?;
        Ok(())
    }

    async fn insert(&self, reminder: &ReminderState) -> anyhow::Result<()> {
        let _: Vec<ReminderRaw> = self.client.post("reminder_state", reminder).await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<ReminderState> {
        let path = format!("reminder_state?id=eq.{}&limit=1", reminder_id);
        match self.client.get::<Vec<ReminderRaw>>(&path).await {
            Ok(rows) => rows.into_iter().next().map(|r| r.into()),
            Err(e) => {
                error!("Failed to find reminder {}: {:?}", reminder_id, e);
                None
            }
        }
    }
}
