#![allow(dead_code)]

use async_trait::async_trait;
use bookdrop::config::BotConfig;
use bookdrop::infrastructure::database::ensure_schema;
use bookdrop::transport::{ChatId, Event, Markup, MessageId, Transport, TransportError};
use bookdrop::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// Everything the workflow sent outward, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SendMessage {
        chat: ChatId,
        text: String,
        markup: Option<Markup>,
        message_id: MessageId,
    },
    EditText {
        chat: ChatId,
        message: MessageId,
        text: String,
    },
    EditCaption {
        chat: ChatId,
        message: MessageId,
        caption: String,
    },
    Delete {
        chat: ChatId,
        message: MessageId,
    },
    SendDocument {
        chat: ChatId,
        file_handle: String,
        caption: String,
        markup: Option<Markup>,
        message_id: MessageId,
    },
    AnswerCallback {
        id: String,
        text: String,
    },
    Pin {
        chat: ChatId,
        message: MessageId,
    },
}

/// Mock transport recording every outbound call.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    next_message_id: AtomicI64,
    /// When set, `send_document` fails, exercising the fallback path.
    pub fail_documents: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> MessageId {
        self.next_message_id.fetch_add(1, Ordering::SeqCst) + 100
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendMessage { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::SendDocument { .. }))
            .collect()
    }

    pub fn answers(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AnswerCallback { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Inline keyboard of the last sent message, if any.
    pub fn last_inline_keyboard(&self) -> Option<Vec<Vec<bookdrop::transport::Button>>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::SendMessage {
                markup: Some(Markup::Inline(rows)),
                ..
            } => Some(rows),
            _ => None,
        })
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        markup: Option<Markup>,
    ) -> Result<MessageId, TransportError> {
        let message_id = self.next_id();
        self.record(Call::SendMessage {
            chat,
            text: text.to_string(),
            markup,
            message_id,
        });
        Ok(message_id)
    }

    async fn edit_message_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        self.record(Call::EditText {
            chat,
            message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn edit_message_caption(
        &self,
        chat: ChatId,
        message: MessageId,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.record(Call::EditCaption {
            chat,
            message,
            caption: caption.to_string(),
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> Result<(), TransportError> {
        self.record(Call::Delete { chat, message });
        Ok(())
    }

    async fn send_document(
        &self,
        chat: ChatId,
        file_handle: &str,
        caption: &str,
        markup: Option<Markup>,
    ) -> Result<MessageId, TransportError> {
        if self.fail_documents.load(Ordering::SeqCst) {
            return Err(TransportError::Api("document unavailable".to_string()));
        }
        let message_id = self.next_id();
        self.record(Call::SendDocument {
            chat,
            file_handle: file_handle.to_string(),
            caption: caption.to_string(),
            markup,
            message_id,
        });
        Ok(message_id)
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), TransportError> {
        self.record(Call::AnswerCallback {
            id: callback_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn pin_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError> {
        self.record(Call::Pin { chat, message });
        Ok(())
    }
}

/// Fresh state over an in-memory database and a recording transport.
pub async fn test_state(admin_id: i64) -> (AppState, Arc<RecordingTransport>) {
    // In-memory SQLite is per-connection; keep the pool at one.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    ensure_schema(&pool).await.unwrap();

    let transport = Arc::new(RecordingTransport::new());
    let config = BotConfig {
        api_token: "test-token".to_string(),
        admin_id,
        ..BotConfig::default()
    };

    let state = AppState::new(pool, transport.clone(), config);
    (state, transport)
}

pub fn text_msg(chat: i64, from: i64, text: &str) -> Event {
    Event::Message {
        chat,
        from,
        text: Some(text.to_string()),
        document: None,
    }
}

pub fn document_msg(chat: i64, from: i64, file_handle: &str) -> Event {
    Event::Message {
        chat,
        from,
        text: None,
        document: Some(file_handle.to_string()),
    }
}

pub fn callback(chat: i64, from: i64, message: i64, data: &str) -> Event {
    Event::Callback {
        id: format!("cb-{data}"),
        chat,
        message,
        from,
        data: data.to_string(),
    }
}
