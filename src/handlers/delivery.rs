use crate::transport::{best_effort, ChatId, MessageId, UserId};
use crate::AppState;
use tracing::{error, warn};

/// Deliver a file picked from a listing or search result.
///
/// The special-file gate lives here, not at listing time: everyone may see a
/// special title in search results, only `allowed_special` users may open it.
pub async fn deliver(
    state: &AppState,
    callback_id: &str,
    chat: ChatId,
    message: MessageId,
    from: UserId,
    file_id: i64,
) -> anyhow::Result<()> {
    let Some(file) = state.library.file_by_id(file_id).await? else {
        warn!("[MISSING FILE] Requested id={} by {}", file_id, from);
        best_effort(
            "missing-file callback answer",
            state
                .transport
                .answer_callback(callback_id, "⚠️ File not found in database.")
                .await,
        );
        state
            .transport
            .send_message(chat, "❌ Sorry, this file is no longer available.", None)
            .await?;
        return Ok(());
    };

    if file.special && !state.library.allowed_special(from).await? {
        state
            .transport
            .answer_callback(callback_id, "🚫 Not allowed.")
            .await?;
        return Ok(());
    }

    // The listing message has served its purpose.
    best_effort(
        "delete listing message",
        state.transport.delete_message(chat, message).await,
    );

    let status = state
        .transport
        .send_message(chat, &format!("📖 Preparing download: {} ...", file.title), None)
        .await?;

    match state
        .transport
        .send_document(chat, &file.file_handle, &format!("📖 {}", file.title), None)
        .await
    {
        Ok(sent) => {
            state
                .expiry
                .schedule(chat, status, sent, &file.title, state.config.delete_delay);
        }
        Err(e) => {
            error!("[FILE SEND ERROR] id={}: {}", file_id, e);
            best_effort(
                "send-failure status edit",
                state
                    .transport
                    .edit_message_text(
                        chat,
                        status,
                        "❌ File could not be sent. It may have been deleted or is unavailable.",
                    )
                    .await,
            );
        }
    }

    Ok(())
}
