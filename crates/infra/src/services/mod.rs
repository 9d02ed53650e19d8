mod twilio;

pub use twilio::{ISmsSender, InMemorySmsSender, TwilioSmsSender};
