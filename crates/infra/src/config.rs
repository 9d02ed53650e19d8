use eventprompt_utils::create_random_secret;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Shared secret guarding the debug endpoints
    pub debug_token: String,
    /// How many due reminders one scheduled tick may process. Small on
    /// purpose: it bounds per-tick external call volume.
    pub batch_size: usize,
    /// Seconds between scheduled dispatch ticks
    pub interval_secs: u64,
    /// Seconds before an unfinished `processing` claim expires and the
    /// reminder becomes selectable again
    pub processing_lease_secs: i64,
    /// When set, households that have already RSVP'd are skipped
    pub require_unresponded_only: bool,
    /// Destination for the /debug/send-test endpoint
    pub test_sms_to: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let debug_token = match std::env::var("DEBUG_TOKEN") {
            Ok(token) => token,
            Err(_) => {
                info!("Did not find DEBUG_TOKEN environment variable. Going to create one.");
                let token = create_random_secret(16);
                info!("Debug token was generated and set to: {}", token);
                token
            }
        };

        let require_unresponded_only = std::env::var("REQUIRE_UNRESPONDED_ONLY")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            port: parse_env_or("PORT", 5000),
            debug_token,
            batch_size: parse_env_or("REMINDER_BATCH_SIZE", 5),
            interval_secs: parse_env_or("REMINDER_INTERVAL_SECS", 60),
            processing_lease_secs: parse_env_or("PROCESSING_LEASE_SECS", 600),
            require_unresponded_only,
            test_sms_to: std::env::var("TWILIO_TEST_TO").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env_or<T>(var: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match std::env::var(var) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value: {}.",
                    var, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}
