//! Telegram channel — message sending via the Bot API.

use async_trait::async_trait;
use naowatch_core::config::TelegramChannelConfig;
use naowatch_core::error::{Result, WatchError};
use naowatch_core::traits::Notifier;
use serde::Deserialize;

/// Telegram Bot API response envelope.
#[derive(Debug, Deserialize)]
pub struct TelegramApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

pub struct TelegramNotifier {
    config: TelegramChannelConfig,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramChannelConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/{}",
            self.config.bot_token, method
        )
    }

    /// Send a text message to the configured chat.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| WatchError::Notification(format!("Telegram sendMessage failed: {e}")))?;

        let result: TelegramApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| WatchError::Notification(format!("Invalid Telegram response: {e}")))?;

        if !result.ok {
            return Err(WatchError::Notification(format!(
                "Telegram API error: {}",
                result.description.unwrap_or_default()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, title: &str, body: &str) -> Result<()> {
        self.send_message(&format!("{title}\n\n{body}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> TelegramNotifier {
        TelegramNotifier::new(TelegramChannelConfig {
            bot_token: "123:abc".into(),
            chat_id: "42".into(),
        })
    }

    #[test]
    fn test_api_url() {
        assert_eq!(
            notifier().api_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_api_response_deserialization() {
        let ok: TelegramApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"ok":true,"result":{"message_id":1}}"#).unwrap();
        assert!(ok.ok);
        assert!(ok.result.is_some());

        let err: TelegramApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"ok":false,"description":"Unauthorized"}"#).unwrap();
        assert!(!err.ok);
        assert_eq!(err.description.as_deref(), Some("Unauthorized"));
    }
}
