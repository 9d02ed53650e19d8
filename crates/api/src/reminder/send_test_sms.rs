use crate::error::EventPromptError;
use crate::shared::auth::protect_debug_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use eventprompt_api_structs::send_test_sms::{APIResponse, QueryParams};
use eventprompt_infra::EventPromptContext;

pub async fn send_test_sms_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<EventPromptContext>,
) -> Result<HttpResponse, EventPromptError> {
    protect_debug_route(query.token.as_deref(), &ctx)?;

    execute(SendTestSmsUseCase {}, &ctx)
        .await
        .map(|message| HttpResponse::Ok().json(APIResponse { ok: true, message }))
        .map_err(EventPromptError::from)
}

/// End-to-end check of the SMS delivery path against the real provider,
/// aimed at the configured test number so no guest ever receives it
#[derive(Debug)]
pub struct SendTestSmsUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    NoTestNumberConfigured,
    SendFailed(String),
}

impl From<UseCaseError> for EventPromptError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NoTestNumberConfigured => {
                Self::BadClientData("No test SMS destination is configured".into())
            }
            UseCaseError::SendFailed(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendTestSmsUseCase {
    type Response = String;

    type Error = UseCaseError;

    const NAME: &'static str = "SendTestSms";

    async fn execute(&mut self, ctx: &EventPromptContext) -> Result<Self::Response, Self::Error> {
        let to = ctx
            .config
            .test_sms_to
            .as_deref()
            .ok_or(UseCaseError::NoTestNumberConfigured)?;

        let sid = ctx
            .sms
            .send(to, "EventPrompt reminder service test message")
            .await
            .map_err(|e| UseCaseError::SendFailed(format!("{:#}", e)))?;

        Ok(format!("Test SMS sent with id {}", sid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::test_helpers::setup_app;

    #[actix_web::main]
    #[test]
    async fn sends_to_the_configured_test_number() {
        let mut app = setup_app();
        app.ctx.config.test_sms_to = Some("+4799999999".into());

        let message = execute(SendTestSmsUseCase {}, &app.ctx).await.unwrap();
        assert_eq!(message, "Test SMS sent with id SM-test-1");

        let sent = app.sms.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+4799999999");
    }

    #[actix_web::main]
    #[test]
    async fn fails_without_a_configured_destination() {
        let mut app = setup_app();
        app.ctx.config.test_sms_to = None;

        let err = execute(SendTestSmsUseCase {}, &app.ctx).await.unwrap_err();
        assert!(matches!(err, UseCaseError::NoTestNumberConfigured));
        assert_eq!(app.sms.sent_count(), 0);
    }
}
