mod inmemory;
mod postgrest;

use eventprompt_domain::{EmailMessage, ID};
pub use inmemory::InMemoryEmailMessageRepo;
pub use postgrest::PostgrestEmailMessageRepo;

#[async_trait::async_trait]
pub trait IEmailMessageRepo: Send + Sync {
    async fn insert(&self, msg: &EmailMessage) -> anyhow::Result<()>;
    /// Idempotency check: whether any row exists for this household and
    /// step, regardless of status
    async fn exists(&self, household_id: &ID, reminder_step: i64) -> anyhow::Result<bool>;
    async fn find_by_household(&self, household_id: &ID) -> anyhow::Result<Vec<EmailMessage>>;
}
