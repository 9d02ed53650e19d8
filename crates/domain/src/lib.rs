mod household;
mod message;
mod reminder;
mod shared;

pub use household::{Event, Household, Tier};
pub use message::{
    reminder_message, EmailMessage, MessageStatus, SmsMessage, REMINDER_EMAIL_SUBJECT,
};
pub use reminder::{
    next_reminder_at, next_step, DueReminder, ReminderDispatch, ReminderState, ReminderStatus,
    REMINDER_STEPS,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
