use crate::transport::{best_effort, ChatId, MessageId, UserId};
use crate::AppState;
use tracing::info;

fn is_admin(state: &AppState, user: UserId) -> bool {
    state.config.has_admin() && user == state.config.admin_id
}

async fn refuse(state: &AppState, callback_id: &str) -> anyhow::Result<()> {
    state
        .transport
        .answer_callback(callback_id, "🚫 Not authorized.")
        .await?;
    Ok(())
}

/// Approve a pending upload; the row becomes visible to listing and search.
pub async fn approve(
    state: &AppState,
    callback_id: &str,
    chat: ChatId,
    message: MessageId,
    from: UserId,
    file_id: i64,
) -> anyhow::Result<()> {
    if !is_admin(state, from) {
        return refuse(state, callback_id).await;
    }

    if !state.library.approve_file(file_id).await {
        anyhow::bail!("approving file id={file_id} failed");
    }

    state
        .transport
        .answer_callback(callback_id, "Approved ✅")
        .await?;
    best_effort(
        "approval caption edit",
        state
            .transport
            .edit_message_caption(chat, message, "File Approved ✅")
            .await,
    );
    info!("Admin approved file id={}", file_id);
    Ok(())
}

/// Reject a pending upload. Terminal: the row is deleted, not marked.
pub async fn reject(
    state: &AppState,
    callback_id: &str,
    chat: ChatId,
    message: MessageId,
    from: UserId,
    file_id: i64,
) -> anyhow::Result<()> {
    if !is_admin(state, from) {
        return refuse(state, callback_id).await;
    }

    if !state.library.delete_file(file_id).await {
        anyhow::bail!("rejecting file id={file_id} failed");
    }

    state
        .transport
        .answer_callback(callback_id, "Rejected ❌")
        .await?;
    best_effort(
        "rejection caption edit",
        state
            .transport
            .edit_message_caption(chat, message, "File Rejected ❌")
            .await,
    );
    info!("Admin rejected file id={}", file_id);
    Ok(())
}

/// Remove an approved file from a listing. Admin-only.
pub async fn remove(
    state: &AppState,
    callback_id: &str,
    chat: ChatId,
    message: MessageId,
    from: UserId,
    file_id: i64,
) -> anyhow::Result<()> {
    if !is_admin(state, from) {
        return refuse(state, callback_id).await;
    }

    if !state.library.delete_file(file_id).await {
        anyhow::bail!("removing file id={file_id} failed");
    }

    state
        .transport
        .answer_callback(callback_id, "🗑️ File deleted.")
        .await?;
    best_effort(
        "delete listing message",
        state.transport.delete_message(chat, message).await,
    );
    info!("Admin removed file id={}", file_id);
    Ok(())
}
