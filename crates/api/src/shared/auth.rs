use crate::error::EventPromptError;
use eventprompt_infra::EventPromptContext;

/// Shared-secret gate for the debug endpoints. The token arrives as a query
/// parameter and must match the configured debug token exactly.
pub fn protect_debug_route(
    token: Option<&str>,
    ctx: &EventPromptContext,
) -> Result<(), EventPromptError> {
    match token {
        Some(token) if token == ctx.config.debug_token => Ok(()),
        _ => Err(EventPromptError::Unauthorized(
            "Missing or invalid debug token".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventprompt_infra::setup_context_inmemory;

    #[test]
    fn accepts_the_configured_token() {
        let mut ctx = setup_context_inmemory();
        ctx.config.debug_token = "secret".into();
        assert!(protect_debug_route(Some("secret"), &ctx).is_ok());
    }

    #[test]
    fn rejects_missing_and_wrong_tokens() {
        let mut ctx = setup_context_inmemory();
        ctx.config.debug_token = "secret".into();
        assert!(protect_debug_route(None, &ctx).is_err());
        assert!(protect_debug_route(Some(""), &ctx).is_err());
        assert!(protect_debug_route(Some("wrong"), &ctx).is_err());
    }
}
