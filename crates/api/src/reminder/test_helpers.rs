use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use eventprompt_domain::{Event, Household, ReminderState, Tier, ID};
use eventprompt_infra::{
    setup_context_inmemory, EventPromptContext, FixedSys, IReminderRepo, InMemoryReminderRepo,
    InMemorySmsSender,
};
use std::sync::Arc;

/// In-memory context frozen at [`test_now`], with handles onto the concrete
/// repo and sender so tests can seed fixtures and inspect outcomes
pub struct TestApp {
    pub ctx: EventPromptContext,
    pub reminders: Arc<InMemoryReminderRepo>,
    pub sms: Arc<InMemorySmsSender>,
}

pub fn test_now() -> DateTime<Utc> {
    Utc.ymd(2021, 5, 25).and_hms(12, 0, 0)
}

pub fn test_event_date() -> NaiveDate {
    NaiveDate::from_ymd(2021, 6, 15)
}

pub fn setup_app() -> TestApp {
    let mut ctx = setup_context_inmemory();

    let reminders = Arc::new(InMemoryReminderRepo::new(ctx.config.processing_lease_secs));
    let sms = Arc::new(InMemorySmsSender::new());
    ctx.repos.reminders = reminders.clone();
    ctx.sms = sms.clone();
    ctx.sys = Arc::new(FixedSys(test_now()));

    TestApp { ctx, reminders, sms }
}

pub fn household(tier: Tier, phone: Option<&str>, email: Option<&str>) -> Household {
    Household {
        id: ID::new(),
        household_name: Some("The Does".into()),
        phone_e164: phone.map(|p| p.to_string()),
        email: email.map(|e| e.to_string()),
        sms_opt_out: false,
        rsvp_attending: None,
        event: Some(Event {
            event_date: test_event_date(),
            tier,
        }),
    }
}

/// Seeds a household together with a reminder at the given step, already
/// past due at [`test_now`]
pub async fn seed_reminder(app: &TestApp, household: &Household, step: i64) -> ReminderState {
    app.reminders.insert_household(household.clone());

    let mut reminder = ReminderState::new(household.id.clone(), test_event_date());
    reminder.reminder_step = step;
    reminder.next_reminder_at = Some(test_now() - Duration::hours(1));
    app.reminders.insert(&reminder).await.unwrap();
    reminder
}
