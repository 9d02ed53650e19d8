use super::ISmsMessageRepo;
use eventprompt_domain::{SmsMessage, ID};
use std::sync::Mutex;

pub struct InMemorySmsMessageRepo {
    messages: Mutex<Vec<SmsMessage>>,
}

impl InMemorySmsMessageRepo {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ISmsMessageRepo for InMemorySmsMessageRepo {
    async fn insert(&self, msg: &SmsMessage) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(msg.clone());
        Ok(())
    }

    async fn find_by_household(&self, household_id: &ID) -> anyhow::Result<Vec<SmsMessage>> {
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
