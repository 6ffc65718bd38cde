// Outbound chat notifications
pub mod messages;
pub mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("platform error ({status}): {body}")]
    Platform { status: u16, body: String },
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        // The bot token is part of the request path
        NotifyError::Network(e.without_url())
    }
}

/// How the chat client should render the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    Plain,
}

/// Sends text to a fixed destination
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str, mode: ParseMode) -> Result<(), NotifyError>;
}
