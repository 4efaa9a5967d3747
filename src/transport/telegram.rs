use super::{Button, ChatId, Event, Markup, MessageId, Transport, TransportError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Long-poll timeout handed to the platform, in seconds.
pub const POLL_TIMEOUT_SECS: u64 = 30;

/// Reconnect backoff bounds for the polling loop.
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Next reconnect delay: double the current one, capped.
pub fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDocument {
    pub file_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub message_id: i64,
    pub chat: WireChat,
    #[serde(default)]
    pub from: Option<WireUser>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<WireDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCallbackQuery {
    pub id: String,
    pub from: WireUser,
    #[serde(default)]
    pub message: Option<WireMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

/// One inbound update from long polling.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<WireMessage>,
    #[serde(default)]
    pub callback_query: Option<WireCallbackQuery>,
}

impl Update {
    /// Decode into a dispatchable event; anything else is dropped.
    pub fn into_event(self) -> Option<Event> {
        if let Some(msg) = self.message {
            let from = msg.from.as_ref().map(|u| u.id)?;
            return Some(Event::Message {
                chat: msg.chat.id,
                from,
                text: msg.text,
                document: msg.document.map(|d| d.file_id),
            });
        }
        if let Some(cb) = self.callback_query {
            let msg = cb.message?;
            return Some(Event::Callback {
                id: cb.id,
                chat: msg.chat.id,
                message: msg.message_id,
                from: cb.from.id,
                data: cb.data?,
            });
        }
        None
    }
}

/// Bot API adapter over plain JSON endpoints.
pub struct TelegramApi {
    http: reqwest::Client,
    base: String,
}

impl TelegramApi {
    pub fn new(token: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 15))
            .build()
            .expect("reqwest client");

        Self {
            http,
            base: format!("https://api.telegram.org/bot{token}"),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: Value,
    ) -> Result<T, TransportError> {
        let url = format!("{}/{}", self.base, method);
        let envelope: ApiEnvelope<T> = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        if !envelope.ok {
            return Err(TransportError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            ));
        }

        envelope
            .result
            .ok_or_else(|| TransportError::Api(format!("{method}: empty result")))
    }

    /// Long-poll for the next batch of updates.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            json!({ "offset": offset, "timeout": POLL_TIMEOUT_SECS }),
        )
        .await
    }
}

fn markup_json(markup: &Markup) -> Value {
    match markup {
        Markup::Inline(rows) => {
            let rows: Vec<Vec<Value>> = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|Button { text, data }| {
                            json!({ "text": text, "callback_data": data })
                        })
                        .collect()
                })
                .collect();
            json!({ "inline_keyboard": rows })
        }
        Markup::Menu(rows) => {
            let rows: Vec<Vec<Value>> = rows
                .iter()
                .map(|row| row.iter().map(|label| json!({ "text": label })).collect())
                .collect();
            json!({ "keyboard": rows, "resize_keyboard": true })
        }
    }
}

#[async_trait]
impl Transport for TelegramApi {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        markup: Option<Markup>,
    ) -> Result<MessageId, TransportError> {
        let mut payload = json!({ "chat_id": chat, "text": text, "parse_mode": "HTML" });
        if let Some(markup) = &markup {
            payload["reply_markup"] = markup_json(markup);
        }
        let sent: WireMessage = self.call("sendMessage", payload).await?;
        Ok(sent.message_id)
    }

    async fn edit_message_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> Result<(), TransportError> {
        let _: Value = self
            .call(
                "editMessageText",
                json!({ "chat_id": chat, "message_id": message, "text": text }),
            )
            .await?;
        Ok(())
    }

    async fn edit_message_caption(
        &self,
        chat: ChatId,
        message: MessageId,
        caption: &str,
    ) -> Result<(), TransportError> {
        let _: Value = self
            .call(
                "editMessageCaption",
                json!({ "chat_id": chat, "message_id": message, "caption": caption }),
            )
            .await?;
        Ok(())
    }

    async fn delete_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> Result<(), TransportError> {
        let _: Value = self
            .call(
                "deleteMessage",
                json!({ "chat_id": chat, "message_id": message }),
            )
            .await?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat: ChatId,
        file_handle: &str,
        caption: &str,
        markup: Option<Markup>,
    ) -> Result<MessageId, TransportError> {
        let mut payload = json!({
            "chat_id": chat,
            "document": file_handle,
            "caption": caption,
            "parse_mode": "HTML",
        });
        if let Some(markup) = &markup {
            payload["reply_markup"] = markup_json(markup);
        }
        let sent: WireMessage = self.call("sendDocument", payload).await?;
        Ok(sent.message_id)
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), TransportError> {
        let _: Value = self
            .call(
                "answerCallbackQuery",
                json!({ "callback_query_id": callback_id, "text": text }),
            )
            .await?;
        Ok(())
    }

    async fn pin_message(&self, chat: ChatId, message: MessageId) -> Result<(), TransportError> {
        let _: Value = self
            .call(
                "pinChatMessage",
                json!({
                    "chat_id": chat,
                    "message_id": message,
                    "disable_notification": true,
                }),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let mut backoff = INITIAL_BACKOFF;
        let mut seen = Vec::new();
        for _ in 0..9 {
            seen.push(backoff.as_secs());
            backoff = next_backoff(backoff);
        }
        assert_eq!(seen, vec![1, 2, 4, 8, 16, 32, 64, 120, 120]);
    }

    #[test]
    fn test_update_decoding() {
        let raw = serde_json::json!({
            "update_id": 7,
            "message": {
                "message_id": 10,
                "chat": { "id": 55 },
                "from": { "id": 42 },
                "text": "/start"
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        match update.into_event() {
            Some(Event::Message { chat, from, text, document }) => {
                assert_eq!(chat, 55);
                assert_eq!(from, 42);
                assert_eq!(text.as_deref(), Some("/start"));
                assert!(document.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_callback_decoding() {
        let raw = serde_json::json!({
            "update_id": 8,
            "callback_query": {
                "id": "cb1",
                "from": { "id": 42 },
                "message": { "message_id": 11, "chat": { "id": 55 } },
                "data": "get_3"
            }
        });
        let update: Update = serde_json::from_value(raw).unwrap();
        match update.into_event() {
            Some(Event::Callback { chat, message, from, data, .. }) => {
                assert_eq!(chat, 55);
                assert_eq!(message, 11);
                assert_eq!(from, 42);
                assert_eq!(data, "get_3");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_update_is_dropped() {
        let raw = serde_json::json!({ "update_id": 9 });
        let update: Update = serde_json::from_value(raw).unwrap();
        assert!(update.into_event().is_none());
    }

    #[test]
    fn test_inline_markup_serialization() {
        let markup = Markup::Inline(vec![vec![Button::new("Algebra Notes", "get_3")]]);
        let value = markup_json(&markup);
        assert_eq!(
            value["inline_keyboard"][0][0]["callback_data"],
            "get_3"
        );
    }
}
