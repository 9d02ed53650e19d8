use super::ISmsMessageRepo;
use crate::repos::shared::postgrest::PostgrestClient;
use eventprompt_domain::{SmsMessage, ID};
use std::sync::Arc;

pub struct PostgrestSmsMessageRepo {
    client: Arc<PostgrestClient>,
}

impl PostgrestSmsMessageRepo {
    pub fn new(client: Arc<PostgrestClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ISmsMessageRepo for PostgrestSmsMessageRepo {
    async fn insert(&self, msg: &SmsMessage) -> anyhow::Result<()> {
        let _: Vec<SmsMessage> = self.client.post("sms_messages", msg).await?;
        Ok(())
    }

    async fn find_by_household(&self, household_id: &ID) -> anyhow::Result<Vec<SmsMessage>> {
        let path = format!(
            "sms_messages?household_id=eq.{}&order=reminder_step.desc",
            household_id
        );
        self.client.get(&path).await
    }
}
