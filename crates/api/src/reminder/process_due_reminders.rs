use super::fetch_due_reminders::FetchDueRemindersUseCase;
use crate::error::EventPromptError;
use crate::shared::auth::protect_debug_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use anyhow::Context;
use eventprompt_api_structs::dtos::ReminderDispatchDTO;
use eventprompt_api_structs::run_reminders_once::{APIResponse, QueryParams};
use eventprompt_domain::{
    next_reminder_at, next_step, reminder_message, DueReminder, EmailMessage, Event, Household,
    MessageStatus, ReminderDispatch, ReminderState, SmsMessage, Tier, REMINDER_EMAIL_SUBJECT,
};
use eventprompt_infra::{
    EventPromptContext, IEmailMessageRepo, IReminderRepo, ISmsMessageRepo,
};
use tracing::{error, warn};

/// Batch size for the manual debug trigger, deliberately smaller than the
/// scheduled one
const DEBUG_BATCH_SIZE: usize = 3;

pub async fn run_reminders_once_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<EventPromptContext>,
) -> Result<HttpResponse, EventPromptError> {
    protect_debug_route(query.token.as_deref(), &ctx)?;

    let usecase = ProcessDueRemindersUseCase {
        limit: DEBUG_BATCH_SIZE,
    };

    execute(usecase, &ctx)
        .await
        .map(|processed| {
            HttpResponse::Ok().json(APIResponse {
                ok: true,
                processed: processed.into_iter().map(ReminderDispatchDTO::new).collect(),
            })
        })
        .map_err(EventPromptError::from)
}

/// The reconciliation loop at the core of the service: claim, send,
/// advance or complete, release on failure. Reminders are processed
/// strictly sequentially, so one reminder's failure or latency never
/// affects the rest of the batch beyond time.
#[derive(Debug)]
pub struct ProcessDueRemindersUseCase {
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(String),
}

impl From<UseCaseError> for EventPromptError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessDueRemindersUseCase {
    type Response = Vec<ReminderDispatch>;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessDueReminders";

    async fn execute(&mut self, ctx: &EventPromptContext) -> Result<Self::Response, Self::Error> {
        let fetch = FetchDueRemindersUseCase { limit: self.limit };
        let reminders = execute(fetch, ctx)
            .await
            .map_err(|e| UseCaseError::StorageError(format!("{:?}", e)))?;

        let mut results = Vec::with_capacity(reminders.len());
        for due in reminders {
            results.push(process_reminder(&due, ctx).await);
        }

        Ok(results)
    }
}

async fn process_reminder(due: &DueReminder, ctx: &EventPromptContext) -> ReminderDispatch {
    let reminder_id = due.reminder.id.clone();

    let claimed = match ctx.repos.reminders.claim(&reminder_id, ctx.sys.now()).await {
        Ok(claimed) => claimed,
        Err(e) => {
            // Same outcome as a lost claim: skip, the next tick retries
            warn!("Claim attempt for reminder {} failed: {:?}", reminder_id, e);
            false
        }
    };
    if !claimed {
        // Benign race: another invocation holds this reminder
        return ReminderDispatch {
            reminder_id,
            sent: false,
            error: None,
        };
    }

    match dispatch_claimed(due, ctx).await {
        Ok(sent) => ReminderDispatch {
            reminder_id,
            sent,
            error: None,
        },
        Err(e) => {
            let error = format!("{:#}", e);
            log_failure(due, &error, ctx).await;
            if let Err(release_err) = ctx.repos.reminders.release(&reminder_id).await {
                error!(
                    "Failed to release claim on reminder {}: {:?}",
                    reminder_id, release_err
                );
            }
            ReminderDispatch {
                reminder_id,
                sent: false,
                error: Some(error),
            }
        }
    }
}

/// Everything between a successful claim and the final state transition.
/// Any error here sends the reminder down the release-and-retry path.
/// Returns whether this step was delivered on some channel.
async fn dispatch_claimed(due: &DueReminder, ctx: &EventPromptContext) -> anyhow::Result<bool> {
    let reminder = &due.reminder;
    let household = due
        .household
        .as_ref()
        .context("Missing household join data")?;
    let event = household.event.as_ref().context("Missing event join data")?;

    let message = reminder_message(household, event, reminder.reminder_step);

    let can_email = if let Some(to_email) = household.contact_email() {
        queue_email_once(household, reminder.reminder_step, to_email, &message, ctx).await?;
        true
    } else {
        false
    };

    // SMS is a premium feature and opt-out always wins
    let sms_to = if event.tier == Tier::Premium && !household.sms_opt_out {
        household.contact_phone()
    } else {
        None
    };

    let to = match sms_to {
        Some(to) => to,
        None => {
            if !can_email {
                // No channel can reach this household; the sequence ends
                // here rather than going silently stale
                ctx.repos.reminders.complete(&reminder.id).await?;
                return Ok(false);
            }

            // Email coverage exists, so the missing SMS channel does not
            // block step progression
            advance_or_complete(reminder, event, ctx).await?;
            return Ok(true);
        }
    };

    let sid = ctx.sms.send(to, &message).await?;

    let log = SmsMessage {
        household_id: household.id.clone(),
        reminder_step: reminder.reminder_step,
        to_e164: to.to_string(),
        body: message,
        status: MessageStatus::Sent,
        provider_message_id: Some(sid),
        error_message: None,
    };
    // The SMS is already out; a failed audit insert must not push the
    // reminder back for a second send
    if let Err(e) = ctx.repos.sms_messages.insert(&log).await {
        error!(
            "Failed to log sent SMS for household {}: {:?}",
            household.id, e
        );
    }

    advance_or_complete(reminder, event, ctx).await?;
    Ok(true)
}

/// Inserts at most one queued email row per (household, step) pair. The row
/// hands the message to the email collaborator; nothing is transmitted from
/// here.
async fn queue_email_once(
    household: &Household,
    reminder_step: i64,
    to_email: &str,
    body: &str,
    ctx: &EventPromptContext,
) -> anyhow::Result<()> {
    let already_queued = ctx
        .repos
        .email_messages
        .exists(&household.id, reminder_step)
        .await?;
    if already_queued {
        return Ok(());
    }

    ctx.repos
        .email_messages
        .insert(&EmailMessage {
            household_id: household.id.clone(),
            reminder_step,
            to_email: to_email.to_string(),
            subject: REMINDER_EMAIL_SUBJECT.to_string(),
            body: body.to_string(),
            status: MessageStatus::Queued,
            provider_message_id: None,
            error_message: None,
        })
        .await
}

async fn advance_or_complete(
    reminder: &ReminderState,
    event: &Event,
    ctx: &EventPromptContext,
) -> anyhow::Result<()> {
    match next_step(reminder.reminder_step) {
        Some(step) => {
            let next_at = next_reminder_at(event.event_date, step);
            ctx.repos.reminders.advance(&reminder.id, step, next_at).await
        }
        None => ctx.repos.reminders.complete(&reminder.id).await,
    }
}

/// Best-effort `failed` audit row. Secondary logging errors are swallowed;
/// the release-and-retry path must run regardless.
async fn log_failure(due: &DueReminder, error: &str, ctx: &EventPromptContext) {
    let household = match &due.household {
        Some(h) => h,
        None => return,
    };
    let to = match household.contact_phone() {
        Some(p) => p,
        None => return,
    };

    let log = SmsMessage {
        household_id: household.id.clone(),
        reminder_step: due.reminder.reminder_step,
        to_e164: to.to_string(),
        body: format!("FAILED: {}", error),
        status: MessageStatus::Failed,
        provider_message_id: None,
        error_message: Some(error.to_string()),
    };
    if let Err(e) = ctx.repos.sms_messages.insert(&log).await {
        warn!(
            "Failed to log reminder failure for household {}: {:?}",
            household.id, e
        );
    }
}
