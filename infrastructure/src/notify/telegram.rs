//! Telegram notifier
//!
//! Sends one Bot API `sendMessage` per completed drafter/editor. The
//! channel is best-effort: errors are returned to the orchestrator,
//! which logs and drops them.

use crate::config::NotifyConfig;
use async_trait::async_trait;
use biodraft_application::ports::notifier::{Notifier, NotifyError};
use serde::Serialize;
use tracing::debug;

const TELEGRAM_API: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: TELEGRAM_API.to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Build from config; `None` when token or chat id is absent, in
    /// which case notifications are disabled.
    pub fn from_config(config: &NotifyConfig) -> Option<Self> {
        let (token, chat_id) = config.resolve()?;
        Some(Self::new(token, chat_id))
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(format!("{}/bot{}/sendMessage", self.base_url, self.token))
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| NotifyError::Failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Failed(format!("HTTP {}: {}", status, body)));
        }

        debug!("Telegram notification sent");
        Ok(())
    }
}
