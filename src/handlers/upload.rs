use crate::services::library::NewFile;
use crate::services::session::{Session, UploadDraft, UploadStep};
use crate::transport::{Button, ChatId, Markup, UserId};
use crate::AppState;
use tracing::info;

/// An incoming document opens the wizard, replacing any pending session.
pub async fn begin(
    state: &AppState,
    chat: ChatId,
    from: UserId,
    file_handle: String,
) -> anyhow::Result<()> {
    state.sessions.set(
        chat,
        Session::Upload(UploadDraft {
            step: UploadStep::Title,
            file_handle,
            title: String::new(),
            tags: String::new(),
            uploader: from,
        }),
    );
    state
        .transport
        .send_message(chat, "📖 Please enter a title for this file:", None)
        .await?;
    Ok(())
}

/// Step 1: any non-empty text becomes the title, blank falls back.
pub async fn set_title(
    state: &AppState,
    chat: ChatId,
    mut draft: UploadDraft,
    text: &str,
) -> anyhow::Result<()> {
    draft.title = if text.is_empty() {
        "Untitled".to_string()
    } else {
        text.to_string()
    };
    draft.step = UploadStep::Tags;
    state.sessions.set(chat, Session::Upload(draft));

    state
        .transport
        .send_message(chat, "🏷️ Enter tags (comma separated, optional):", None)
        .await?;
    Ok(())
}

/// Step 2: tags stored verbatim, emptiness included.
pub async fn set_tags(
    state: &AppState,
    chat: ChatId,
    mut draft: UploadDraft,
    text: &str,
) -> anyhow::Result<()> {
    draft.tags = text.to_string();
    draft.step = UploadStep::SpecialChoice;
    state.sessions.set(chat, Session::Upload(draft));

    let choice = Markup::Inline(vec![vec![
        Button::new("✅ Yes", "special_yes"),
        Button::new("❌ No", "special_no"),
    ]]);
    state
        .transport
        .send_message(chat, "🔒 Is this a special file?", Some(choice))
        .await?;
    Ok(())
}

/// Step 3: special choice. Only the administrator can actually mark a file
/// special; anyone else is silently downgraded. Inserts the row unapproved
/// and forwards it to the admin queue.
pub async fn finish(
    state: &AppState,
    chat: ChatId,
    from: UserId,
    wants_special: bool,
) -> anyhow::Result<()> {
    let Some(Session::Upload(draft)) = state.sessions.get(chat) else {
        // Stale button press after the wizard ended.
        return Ok(());
    };
    if draft.step != UploadStep::SpecialChoice {
        // Stale button from a wizard that was since restarted; the draft is
        // incomplete and must not be stored.
        return Ok(());
    }

    let special = wants_special && state.config.has_admin() && from == state.config.admin_id;
    let file = NewFile {
        file_handle: draft.file_handle.clone(),
        title: draft.title.clone(),
        tags: draft.tags.clone(),
        special,
        uploader: draft.uploader,
    };

    let Some(id) = state.library.insert_file(&file).await else {
        anyhow::bail!("storing upload failed");
    };
    state.sessions.clear(chat);
    info!("📥 New upload id={} title={:?} uploader={}", id, file.title, file.uploader);

    state
        .transport
        .send_message(chat, "✅ File submitted for admin approval.", None)
        .await?;

    if !state.config.has_admin() {
        info!("No admin configured; upload id={} stays in the queue", id);
        return Ok(());
    }

    let review = Markup::Inline(vec![vec![
        Button::new("✅ Approve", format!("approve_{id}")),
        Button::new("❌ Reject", format!("reject_{id}")),
    ]]);
    state
        .transport
        .send_document(
            state.config.admin_id,
            &file.file_handle,
            &format!("📥 New Upload\n<b>{}</b>", file.title),
            Some(review),
        )
        .await?;
    Ok(())
}
