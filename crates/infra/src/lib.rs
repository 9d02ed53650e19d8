mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{
    IEmailMessageRepo, IReminderRepo, ISmsMessageRepo, InMemoryEmailMessageRepo,
    InMemoryReminderRepo, InMemorySmsMessageRepo, Repos,
};
pub use services::{ISmsSender, InMemorySmsSender, TwilioSmsSender};
use std::sync::Arc;
pub use system::{FixedSys, ISys};
use system::RealSys;

#[derive(Clone)]
pub struct EventPromptContext {
    pub repos: Repos,
    pub config: Config,
    pub sms: Arc<dyn ISmsSender>,
    pub sys: Arc<dyn ISys>,
}

/// Will setup the infrastructure context given the environment. Panics on
/// missing credentials so misconfiguration surfaces at startup, before any
/// reminder is touched.
pub fn setup_context() -> EventPromptContext {
    const STORE_URL: &str = "SUPABASE_URL";
    const STORE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";

    let base_url =
        std::env::var(STORE_URL).unwrap_or_else(|_| panic!("{} env var to be present.", STORE_URL));
    let service_role_key =
        std::env::var(STORE_KEY).unwrap_or_else(|_| panic!("{} env var to be present.", STORE_KEY));

    let config = Config::new();
    EventPromptContext {
        repos: Repos::create_postgrest(&base_url, &service_role_key, config.processing_lease_secs),
        sms: Arc::new(TwilioSmsSender::from_env()),
        sys: Arc::new(RealSys {}),
        config,
    }
}

/// Context backed by in-memory repositories and a recording SMS sender.
/// Tests swap in their own clock and fixtures through the public fields.
pub fn setup_context_inmemory() -> EventPromptContext {
    let config = Config::new();
    EventPromptContext {
        repos: Repos::create_inmemory(config.processing_lease_secs),
        sms: Arc::new(InMemorySmsSender::new()),
        sys: Arc::new(RealSys {}),
        config,
    }
}
