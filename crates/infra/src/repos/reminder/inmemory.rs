use super::IReminderRepo;
use chrono::{DateTime, Duration, Utc};
use eventprompt_domain::{DueReminder, Household, ReminderState, ReminderStatus, ID};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<ReminderState>>,
    households: Mutex<Vec<Household>>,
    processing_lease_secs: i64,
}

impl InMemoryReminderRepo {
    pub fn new(processing_lease_secs: i64) -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
            households: Mutex::new(Vec::new()),
            processing_lease_secs,
        }
    }

    /// Seeds the household (and nested event) context that the real store
    /// joins onto due reminders
    pub fn insert_household(&self, household: Household) {
        self.households.lock().unwrap().push(household);
    }

    fn is_due(&self, r: &ReminderState, now: DateTime<Utc>) -> bool {
        let cutoff = now - Duration::seconds(self.processing_lease_secs);
        match r.status {
            ReminderStatus::Active => r.next_reminder_at.map_or(false, |at| at <= now),
            ReminderStatus::Processing => r.claimed_at.map_or(false, |at| at <= cutoff),
            ReminderStatus::Completed => false,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<DueReminder>> {
        let reminders = self.reminders.lock().unwrap();
        let households = self.households.lock().unwrap();

        let mut due: Vec<ReminderState> = reminders
            .iter()
            .filter(|r| self.is_due(r, now))
            .cloned()
            .collect();
        due.sort_by_key(|r| r.next_reminder_at);

        Ok(due
            .into_iter()
            .take(limit)
            .map(|reminder| {
                let household = households
                    .iter()
                    .find(|h| h.id == reminder.household_id)
                    .cloned();
                DueReminder {
                    reminder,
                    household,
                }
            })
            .collect())
    }

    async fn claim(&self, reminder_id: &ID, now: DateTime<Utc>) -> anyhow::Result<bool> {
        let cutoff = now - Duration::seconds(self.processing_lease_secs);
        let mut reminders = self.reminders.lock().unwrap();
        let reminder = match reminders.iter_mut().find(|r| r.id == *reminder_id) {
            Some(r) => r,
            None => return Ok(false),
        };

        let claimable = match reminder.status {
            ReminderStatus::Active => true,
            ReminderStatus::Processing => reminder.claimed_at.map_or(false, |at| at <= cutoff),
            ReminderStatus::Completed => false,
        };
        if !claimable {
            return Ok(false);
        }

        reminder.status = ReminderStatus::Processing;
        reminder.claimed_at = Some(now);
        Ok(true)
    }

    async fn release(&self, reminder_id: &ID) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        if let Some(reminder) = reminders.iter_mut().find(|r| r.id == *reminder_id) {
            reminder.status = ReminderStatus::Active;
            reminder.claimed_at = None;
        }
        Ok(())
    }

    async fn advance(
        &self,
        reminder_id: &ID,
        next_step: i64,
        next_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        if let Some(reminder) = reminders.iter_mut().find(|r| r.id == *reminder_id) {
            reminder.status = ReminderStatus::Active;
            reminder.reminder_step = next_step;
            reminder.next_reminder_at = Some(next_at);
            reminder.claimed_at = None;
        }
        Ok(())
    }

    async fn complete(&self, reminder_id: &ID) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        if let Some(reminder) = reminders.iter_mut().find(|r| r.id == *reminder_id) {
            reminder.status = ReminderStatus::Completed;
            reminder.next_reminder_at = None;
            reminder.claimed_at = None;
        }
        Ok(())
    }

    async fn insert(&self, reminder: &ReminderState) -> anyhow::Result<()> {
        self.reminders.lock().unwrap().push(reminder.clone());
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<ReminderState> {
        self.reminders
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == *reminder_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use eventprompt_domain::next_reminder_at;

    fn now() -> DateTime<Utc> {
        Utc.ymd(2021, 5, 25).and_hms(12, 0, 0)
    }

    fn due_reminder() -> ReminderState {
        ReminderState::new(ID::new(), NaiveDate::from_ymd(2021, 6, 15))
    }

    #[tokio::test]
    async fn claim_applies_to_at_most_one_caller() {
        let repo = InMemoryReminderRepo::new(600);
        let reminder = due_reminder();
        repo.insert(&reminder).await.unwrap();

        assert!(repo.claim(&reminder.id, now()).await.unwrap());
        // The losing side of the race observes zero affected rows
        assert!(!repo.claim(&reminder.id, now()).await.unwrap());
    }

    #[tokio::test]
    async fn stale_processing_claim_expires_with_the_lease() {
        let repo = InMemoryReminderRepo::new(600);
        let reminder = due_reminder();
        repo.insert(&reminder).await.unwrap();

        assert!(repo.claim(&reminder.id, now()).await.unwrap());

        let before_expiry = now() + chrono::Duration::seconds(599);
        assert!(!repo.claim(&reminder.id, before_expiry).await.unwrap());
        assert!(repo.find_due(before_expiry, 10).await.unwrap().is_empty());

        let after_expiry = now() + chrono::Duration::seconds(601);
        assert_eq!(repo.find_due(after_expiry, 10).await.unwrap().len(), 1);
        assert!(repo.claim(&reminder.id, after_expiry).await.unwrap());
    }

    #[tokio::test]
    async fn due_rows_come_back_oldest_first() {
        let repo = InMemoryReminderRepo::new(600);

        let mut older = due_reminder();
        older.next_reminder_at = Some(now() - chrono::Duration::hours(5));
        let mut newer = due_reminder();
        newer.next_reminder_at = Some(now() - chrono::Duration::hours(1));
        let mut future = due_reminder();
        future.next_reminder_at = Some(now() + chrono::Duration::hours(1));

        repo.insert(&newer).await.unwrap();
        repo.insert(&future).await.unwrap();
        repo.insert(&older).await.unwrap();

        let due = repo.find_due(now(), 10).await.unwrap();
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].reminder.id, older.id);
        assert_eq!(due[1].reminder.id, newer.id);
    }

    #[tokio::test]
    async fn completed_rows_are_never_selected() {
        let repo = InMemoryReminderRepo::new(600);
        let reminder = due_reminder();
        repo.insert(&reminder).await.unwrap();
        repo.complete(&reminder.id).await.unwrap();

        assert!(repo.find_due(now(), 10).await.unwrap().is_empty());
        let stored = repo.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Completed);
        assert!(stored.next_reminder_at.is_none());
    }

    #[test]
    fn new_reminders_are_due_at_event_minus_first_step() {
        let event_date = NaiveDate::from_ymd(2021, 6, 15);
        let reminder = ReminderState::new(ID::new(), event_date);
        assert_eq!(
            reminder.next_reminder_at,
            Some(next_reminder_at(event_date, 21))
        );
    }
}
