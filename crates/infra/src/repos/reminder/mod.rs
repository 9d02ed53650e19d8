mod inmemory;
mod postgrest;

use chrono::{DateTime, Utc};
use eventprompt_domain::{DueReminder, ReminderState, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgrest::PostgrestReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Due rows ordered oldest first, with household and event context
    /// expanded in the same round trip. Includes `processing` rows whose
    /// claim lease has expired.
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<DueReminder>>;
    /// Conditional `active -> processing` transition, the sole concurrency
    /// control in the system. Returns whether a row was actually updated;
    /// `false` means another invocation holds the reminder.
    async fn claim(&self, reminder_id: &ID, now: DateTime<Utc>) -> anyhow::Result<bool>;
    /// Failure revert: back to `active` with step and timestamp untouched
    /// so the next tick retries
    async fn release(&self, reminder_id: &ID) -> anyhow::Result<()>;
    async fn advance(
        &self,
        reminder_id: &ID,
        next_step: i64,
        next_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    /// Terminal transition; `next_reminder_at` is nulled
    async fn complete(&self, reminder_id: &ID) -> anyhow::Result<()>;
    /// Producer-side insert, as the guest-import pipeline performs it
    async fn insert(&self, reminder: &ReminderState) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<ReminderState>;
}
