use serde::Deserialize;
use std::sync::Mutex;
use tracing::error;

/// Sends one SMS per call and reports the provider-assigned message id.
/// No retry, no batching: fire and report.
#[async_trait::async_trait]
pub trait ISmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> anyhow::Result<String>;
}

const TWILIO_API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

pub struct TwilioSmsSender {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    /// When set, every send is redirected here regardless of the real
    /// destination. Keeps test traffic away from real guests.
    force_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
}

impl TwilioSmsSender {
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
        force_to: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid,
            auth_token,
            from_number,
            force_to,
        }
    }

    /// Panics on missing credentials so misconfiguration surfaces at
    /// startup. The destination override only applies in the dev
    /// environment.
    pub fn from_env() -> Self {
        let account_sid = require_env("TWILIO_ACCOUNT_SID");
        let auth_token = require_env("TWILIO_AUTH_TOKEN");
        let from_number = require_env("TWILIO_FROM_NUMBER");

        let is_dev = std::env::var("APP_ENV")
            .map(|env| env.to_lowercase() == "dev")
            .unwrap_or(false);
        let force_to = if is_dev {
            std::env::var("DEV_FORCE_SMS_TO").ok()
        } else {
            None
        };

        Self::new(account_sid, auth_token, from_number, force_to)
    }
}

fn require_env(var: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| panic!("{} env var to be present.", var))
}

#[async_trait::async_trait]
impl ISmsSender for TwilioSmsSender {
    async fn send(&self, to: &str, body: &str) -> anyhow::Result<String> {
        let to = self.force_to.as_deref().unwrap_or(to);
        let params = [
            ("From", self.from_number.as_str()),
            ("To", to),
            ("Body", body),
        ];

        let res = self
            .client
            .post(&format!(
                "{}/Accounts/{}/Messages.json",
                TWILIO_API_BASE_URL, self.account_sid
            ))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Twilio API POST error. Error message: {:?}", e);
                anyhow::Error::new(e)
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("Twilio send failed. Status: {}, body: {}", status, body);
            anyhow::bail!("Twilio send failed. Status: {}, body: {}", status, body);
        }

        let message: TwilioMessageResponse = res.json().await.map_err(|e| {
            error!(
                "[Unexpected Response] Twilio response was not valid JSON. Error message: {:?}",
                e
            );
            anyhow::Error::new(e)
        })?;
        Ok(message.sid)
    }
}

/// Recording sender used wherever the in-memory repos are used. Can be
/// armed to fail to exercise the revert-and-retry path.
pub struct InMemorySmsSender {
    sent: Mutex<Vec<(String, String)>>,
    fail_with: Mutex<Option<String>>,
}

impl InMemorySmsSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    /// Every subsequent send fails with the given provider error
    pub fn fail_with(&self, error: &str) {
        *self.fail_with.lock().unwrap() = Some(error.to_string());
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// (destination, body) pairs in send order
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemorySmsSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISmsSender for InMemorySmsSender {
    async fn send(&self, to: &str, body: &str) -> anyhow::Result<String> {
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            anyhow::bail!("{}", error);
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((to.to_string(), body.to_string()));
        Ok(format!("SM-test-{}", sent.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inmemory_sender_records_sends_and_assigns_ids() {
        let sender = InMemorySmsSender::new();
        let sid = sender.send("+4712345678", "hello").await.unwrap();
        assert_eq!(sid, "SM-test-1");
        assert_eq!(
            sender.sent_messages(),
            vec![("+4712345678".to_string(), "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn inmemory_sender_can_be_armed_to_fail() {
        let sender = InMemorySmsSender::new();
        sender.fail_with("Twilio failed: boom");
        let err = sender.send("+4712345678", "hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Twilio failed: boom");
        assert_eq!(sender.sent_count(), 0);
    }
}
