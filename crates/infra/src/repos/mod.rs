mod email_message;
mod reminder;
mod shared;
mod sms_message;

pub use email_message::{IEmailMessageRepo, InMemoryEmailMessageRepo, PostgrestEmailMessageRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, PostgrestReminderRepo};
use shared::postgrest::PostgrestClient;
pub use sms_message::{ISmsMessageRepo, InMemorySmsMessageRepo, PostgrestSmsMessageRepo};
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub sms_messages: Arc<dyn ISmsMessageRepo>,
    pub email_messages: Arc<dyn IEmailMessageRepo>,
}

impl Repos {
    pub fn create_postgrest(
        base_url: &str,
        service_role_key: &str,
        processing_lease_secs: i64,
    ) -> Self {
        let client = Arc::new(PostgrestClient::new(base_url, service_role_key));
        Self {
            reminders: Arc::new(PostgrestReminderRepo::new(
                client.clone(),
                processing_lease_secs,
            )),
            sms_messages: Arc::new(PostgrestSmsMessageRepo::new(client.clone())),
            email_messages: Arc::new(PostgrestEmailMessageRepo::new(client)),
        }
    }

    pub fn create_inmemory(processing_lease_secs: i64) -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new(processing_lease_secs)),
            sms_messages: Arc::new(InMemorySmsMessageRepo::new()),
            email_messages: Arc::new(InMemoryEmailMessageRepo::new()),
        }
    }
}
