//! Outgoing chat messages and the failures they can run into.

use async_trait::async_trait;
use teloxide::{
    payloads::SendMessageSetters,
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, WebAppInfo},
    ApiError, RequestError,
};
use url::Url;

/// Inline button that opens the mini-app inside the chat client.
#[derive(Debug, Clone, PartialEq)]
pub struct WebAppButton {
    pub label: String,
    pub url: Url,
}

/// A message to send back to a chat. Text is HTML-formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub web_app: Option<WebAppButton>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            web_app: None,
        }
    }

    pub fn with_web_app(mut self, label: impl Into<String>, url: Url) -> Self {
        self.web_app = Some(WebAppButton {
            label: label.into(),
            url,
        });
        self
    }
}

/// What to do when a reply could not be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Drop silently.
    Suppress,
    /// Log and move on.
    Log,
    /// Log and tell the user something went wrong.
    Notify,
}

/// Delivery failures, classified by how they should be handled.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TransportError {
    #[error("bot was blocked by the user")]
    Blocked,
    #[error("network failure: {0}")]
    Network(String),
    #[error("request rejected by the platform: {0}")]
    Rejected(String),
    #[error("unexpected transport failure: {0}")]
    Unexpected(String),
}

impl TransportError {
    pub fn policy(&self) -> ErrorPolicy {
        match self {
            TransportError::Blocked => ErrorPolicy::Suppress,
            TransportError::Network(_) | TransportError::Rejected(_) => ErrorPolicy::Log,
            TransportError::Unexpected(_) => ErrorPolicy::Notify,
        }
    }
}

impl From<RequestError> for TransportError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Api(ApiError::BotBlocked) => TransportError::Blocked,
            RequestError::Api(api) => TransportError::Rejected(api.to_string()),
            RequestError::Network(e) => TransportError::Network(e.to_string()),
            RequestError::Io(e) => TransportError::Network(e.to_string()),
            other => TransportError::Unexpected(other.to_string()),
        }
    }
}

/// Anything that can deliver a [`Reply`] to a chat.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<(), TransportError>;
}

#[async_trait]
impl ChatTransport for Bot {
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<(), TransportError> {
        let mut request = self
            .send_message(ChatId(chat_id), reply.text.clone())
            .parse_mode(ParseMode::Html);

        if let Some(button) = &reply.web_app {
            let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::web_app(
                button.label.clone(),
                WebAppInfo {
                    url: button.url.clone(),
                },
            )]]);
            request = request.reply_markup(keyboard);
        }

        request.await?;
        Ok(())
    }
}
