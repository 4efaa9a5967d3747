pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub type ChatId = i64;
pub type UserId = i64;
pub type MessageId = i64;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bot api error: {0}")]
    Api(String),
}

/// One inline button carrying an opaque callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// Inline buttons below a message; presses come back as callbacks.
    Inline(Vec<Vec<Button>>),
    /// Persistent reply keyboard; presses come back as plain text.
    Menu(Vec<Vec<String>>),
}

/// Inbound event after decoding, decoupled from the wire format.
#[derive(Debug, Clone)]
pub enum Event {
    Message {
        chat: ChatId,
        from: UserId,
        text: Option<String>,
        /// Transport-level handle of an attached document, if any.
        document: Option<String>,
    },
    Callback {
        id: String,
        chat: ChatId,
        message: MessageId,
        from: UserId,
        data: String,
    },
}

/// Outbound boundary to the messaging platform.
///
/// All calls are best-effort from the workflow's point of view; which
/// failures matter is decided at each call site.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        markup: Option<Markup>,
    ) -> Result<MessageId, TransportError>;

    async fn edit_message_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), TransportError>;

    async fn edit_message_caption(
        &self,
        chat: ChatId,
        message: MessageId,
        caption: &str,
    ) -> Result<(), TransportError>;

    async fn delete_message(&self, chat: ChatId, message: MessageId)
        -> Result<(), TransportError>;

    async fn send_document(
        &self,
        chat: ChatId,
        file_handle: &str,
        caption: &str,
        markup: Option<Markup>,
    ) -> Result<MessageId, TransportError>;

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), TransportError>;

    async fn pin_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError>;
}

/// Non-critical operation wrapper: log the failure and move on.
///
/// Used for edits, deletes and pins where the target message may already be
/// gone and the flow must not care.
pub fn best_effort<T>(what: &str, res: Result<T, TransportError>) {
    if let Err(e) = res {
        warn!("[NON-CRITICAL] {} failed: {}", what, e);
    }
}
