use super::{Notifier, NotifyError, ParseMode};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Sends messages to one chat through the Telegram Bot API
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    chat_id: String,
    api_base: String,
}

/// Payload for `sendMessage`
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            chat_id,
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str, mode: ParseMode) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: match mode {
                ParseMode::Markdown => Some("Markdown"),
                ParseMode::Plain => None,
            },
        };

        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Platform {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(chat_id = %self.chat_id, "Telegram message delivered");
        Ok(())
    }
}
