use super::IEmailMessageRepo;
use eventprompt_domain::{EmailMessage, ID};
use std::sync::Mutex;

pub struct InMemoryEmailMessageRepo {
    messages: Mutex<Vec<EmailMessage>>,
}

impl InMemoryEmailMessageRepo {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEmailMessageRepo for InMemoryEmailMessageRepo {
    async fn insert(&self, msg: &EmailMessage) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(msg.clone());
        Ok(())
    }

    async fn exists(&self, household_id: &ID, reminder_step: i64) -> anyhow::Result<bool> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.household_id == *household_id && m.reminder_step == reminder_step))
    }

    async fn find_by_household(&self, household_id: &ID) -> anyhow::Result<Vec<EmailMessage>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.household_id == *household_id)
            .cloned()
            .collect())
    }
}
