mod inmemory;
mod postgrest;

use eventprompt_domain::{SmsMessage, ID};
pub use inmemory::InMemorySmsMessageRepo;
pub use postgrest::PostgrestSmsMessageRepo;

#[async_trait::async_trait]
pub trait ISmsMessageRepo: Send + Sync {
    /// Appends one audit row. One pinned payload shape; schema evolution is
    /// handled by migration, not by probing insert shapes at runtime.
    async fn insert(&self, msg: &SmsMessage) -> anyhow::Result<()>;
    async fn find_by_household(&self, household_id: &ID) -> anyhow::Result<Vec<SmsMessage>>;
}
