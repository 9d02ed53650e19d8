use crate::error::EventPromptError;
use actix_web::{web, HttpResponse};
use eventprompt_api_structs::dtos::ReminderStateDTO;
use eventprompt_api_structs::{get_reminders_health, get_service_health};
use eventprompt_infra::{EventPromptContext, IReminderRepo};
use tracing::error;

/// How many due rows the health endpoint will surface at most
const HEALTH_BATCH_SIZE: usize = 10;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(status_controller));
    cfg.route("/health", web::get().to(health_controller));
}

async fn status_controller() -> HttpResponse {
    HttpResponse::Ok().json(get_service_health::APIResponse {
        message: "EventPrompt reminder service is running".into(),
    })
}

async fn health_controller(
    ctx: web::Data<EventPromptContext>,
) -> Result<HttpResponse, EventPromptError> {
    reminders_health(&ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
}

/// Raw view of the head of the due queue, before any eligibility
/// filtering. Rows that dispatch will never pick up, such as households
/// with no contact channel, must still show up here or an operator cannot
/// see the queue grow.
async fn reminders_health(
    ctx: &EventPromptContext,
) -> Result<get_reminders_health::APIResponse, EventPromptError> {
    let due = ctx
        .repos
        .reminders
        .find_due(ctx.sys.now(), HEALTH_BATCH_SIZE)
        .await
        .map_err(|e| {
            error!("Health check failed to query due reminders: {:?}", e);
            EventPromptError::InternalError
        })?;

    let reminders: Vec<_> = due
        .into_iter()
        .map(|r| ReminderStateDTO::new(r.reminder))
        .collect();
    Ok(get_reminders_health::APIResponse {
        ok: true,
        count: reminders.len(),
        reminders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::test_helpers::{household, seed_reminder, setup_app};
    use eventprompt_domain::Tier;

    #[actix_web::main]
    #[test]
    async fn health_reports_the_currently_due_reminders() {
        let app = setup_app();
        let h = household(Tier::Premium, Some("+4712345678"), None);
        let reminder = seed_reminder(&app, &h, 21).await;

        let res = reminders_health(&app.ctx).await.unwrap();
        assert!(res.ok);
        assert_eq!(res.count, 1);
        assert_eq!(res.reminders[0].id, reminder.id);
    }

    #[actix_web::main]
    #[test]
    async fn health_reports_due_rows_dispatch_will_never_pick_up() {
        let app = setup_app();
        // No contact channel at all: selection skips it forever, so it
        // stays active and due. Health is the only place it surfaces.
        let unreachable = household(Tier::Standard, None, None);
        let reminder = seed_reminder(&app, &unreachable, 21).await;

        let res = reminders_health(&app.ctx).await.unwrap();
        assert_eq!(res.count, 1);
        assert_eq!(res.reminders[0].id, reminder.id);
    }
}
