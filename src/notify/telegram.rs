// src/notify/telegram.rs
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use super::Notifier;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram Bot API notifier. The destination chat id is part of its
/// configuration; callers only hand over the formatted message.
pub struct TelegramNotifier {
    api_base: String,
    token: String,
    chat_id: String,
    client: Client,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token,
            chat_id,
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Point at a local stub server in tests.
    pub fn with_api_base(mut self, base: String) -> Self {
        self.api_base = base;
        self
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
        });

        self.client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("telegram post")?
            .error_for_status()
            .context("telegram non-2xx")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
