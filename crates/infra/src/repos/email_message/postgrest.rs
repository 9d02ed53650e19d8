use super::IEmailMessageRepo;
use crate::repos::shared::postgrest::PostgrestClient;
use eventprompt_domain::{EmailMessage, ID};
use serde_json::Value;
use std::sync::Arc;

pub struct PostgrestEmailMessageRepo {
    client: Arc<PostgrestClient>,
}

impl PostgrestEmailMessageRepo {
    pub fn new(client: Arc<PostgrestClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IEmailMessageRepo for PostgrestEmailMessageRepo {
    async fn insert(&self, msg: &EmailMessage) -> anyhow::Result<()> {
        let _: Vec<EmailMessage> = self.client.post("email_messages", msg).await?;
        Ok(())
    }

    async fn exists(&self, household_id: &ID, reminder_step: i64) -> anyhow::Result<bool> {
        let path = format!(
            "email_messages?household_id=eq.{}&reminder_step=eq.{}&select=household_id&limit=1",
            household_id, reminder_step
        );
        let rows: Vec<Value> = self.client.get(&path).await?;
        Ok(!rows.is_empty())
    }

    async fn find_by_household(&self, household_id: &ID) -> anyhow::Result<Vec<EmailMessage>> {
        let path = format!(
            "email_messages?household_id=eq.{}&order=reminder_step.desc",
            household_id
        );
        self.client.get(&path).await
    }
}
