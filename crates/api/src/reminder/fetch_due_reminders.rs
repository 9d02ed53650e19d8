use crate::shared::usecase::UseCase;
use eventprompt_domain::DueReminder;
use eventprompt_infra::{EventPromptContext, IReminderRepo};

/// Pulls the reminders due at this tick and drops households the service
/// cannot or should not reach. Read-only, so re-running it has no
/// consequence.
#[derive(Debug)]
pub struct FetchDueRemindersUseCase {
    /// Bounds the number of rows one invocation will look at
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for FetchDueRemindersUseCase {
    type Response = Vec<DueReminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "FetchDueReminders";

    async fn execute(&mut self, ctx: &EventPromptContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let due = ctx
            .repos
            .reminders
            .find_due(now, self.limit)
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?;

        Ok(due
            .into_iter()
            .filter(|r| is_eligible(r, ctx.config.require_unresponded_only))
            .collect())
    }
}

/// Pure filter over the joined household context
fn is_eligible(due: &DueReminder, require_unresponded_only: bool) -> bool {
    let household = match &due.household {
        Some(h) => h,
        None => return false,
    };

    if require_unresponded_only && household.has_responded() {
        return false;
    }

    household.has_contact_info()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::test_helpers::{household, seed_reminder, setup_app};
    use crate::shared::usecase::execute;
    use eventprompt_domain::{DueReminder, ReminderState, Tier, ID};
    use chrono::NaiveDate;

    fn due(household: Option<eventprompt_domain::Household>) -> DueReminder {
        DueReminder {
            reminder: ReminderState::new(ID::new(), NaiveDate::from_ymd(2021, 6, 15)),
            household,
        }
    }

    #[test]
    fn missing_household_join_is_ineligible() {
        assert!(!is_eligible(&due(None), false));
    }

    #[test]
    fn household_without_any_contact_channel_is_ineligible() {
        let h = household(Tier::Premium, None, None);
        assert!(!is_eligible(&due(Some(h)), false));
    }

    #[test]
    fn responded_household_is_skipped_only_when_flag_is_set() {
        let mut h = household(Tier::Premium, Some("+4712345678"), None);
        h.rsvp_attending = Some(true);

        let row = due(Some(h));
        assert!(is_eligible(&row, false));
        assert!(!is_eligible(&row, true));

        // Declined counts as responded too
        let mut declined = household(Tier::Premium, Some("+4712345678"), None);
        declined.rsvp_attending = Some(false);
        assert!(!is_eligible(&due(Some(declined)), true));
    }

    #[actix_web::main]
    #[test]
    async fn returns_only_reachable_due_reminders() {
        let app = setup_app();

        let reachable = household(Tier::Standard, None, Some("does@example.com"));
        let unreachable = household(Tier::Standard, None, None);
        let with_contact = seed_reminder(&app, &reachable, 21).await;
        seed_reminder(&app, &unreachable, 21).await;

        // This row has no household context at all
        let orphan = ReminderState::new(ID::new(), NaiveDate::from_ymd(2021, 6, 15));
        app.reminders.insert(&orphan).await.unwrap();

        let usecase = FetchDueRemindersUseCase { limit: 10 };
        let due = execute(usecase, &app.ctx).await.unwrap();

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].reminder.id, with_contact.id);
    }
}
