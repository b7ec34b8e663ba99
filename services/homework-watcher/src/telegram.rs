//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::io::HttpClient;
use crate::notifier::Notifier;
use crate::WatcherError;

/// Envelope returned by every Bot API method
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to one fixed chat through a Telegram bot
pub struct TelegramNotifier {
    send_message_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(
        api_base_url: &str,
        bot_token: &str,
        chat_id: &str,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        tracing::debug!("Created TelegramNotifier for chat {}", chat_id);

        Self {
            send_message_url: format!(
                "{}/bot{}/sendMessage",
                api_base_url.trim_end_matches('/'),
                bot_token
            ),
            chat_id: chat_id.to_string(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: &str) -> crate::Result<()> {
        tracing::debug!("Sending Telegram message: \"{}\"", message);

        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
        });

        let response = self
            .http
            .post_json(&self.send_message_url, &body)
            .await
            .map_err(|e| WatcherError::Delivery(e.to_string()))?;

        let parsed = serde_json::from_str::<TelegramResponse>(&response.body).ok();

        if response.status != 200 || !parsed.as_ref().is_some_and(|r| r.ok) {
            let description = parsed
                .and_then(|r| r.description)
                .unwrap_or(response.body);
            return Err(WatcherError::Delivery(format!(
                "Telegram API returned status {}: {}",
                response.status, description
            )));
        }

        tracing::debug!("Telegram message sent: \"{}\"", message);
        Ok(())
    }
}
