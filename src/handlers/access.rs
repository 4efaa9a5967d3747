use super::{LIST_LABEL, SEARCH_LABEL, SPECIAL_LABEL};
use crate::services::session::Session;
use crate::transport::{best_effort, ChatId, Markup, UserId};
use crate::AppState;
use tracing::info;

const WELCOME: &str = "📚 <b>Welcome to the E-Books & Subject Books Sharing Bot</b>!\n\n\
    📖 Download books\n\
    🔍 Search by title/tags\n\
    📤 Upload your own files (sent for admin approval)\n\
    contact admin @kexerbot";

/// Reply keyboard for a user; the special entry appears only once the PIN
/// flow has granted access.
pub async fn main_menu_for(state: &AppState, user_id: UserId) -> anyhow::Result<Markup> {
    let mut rows = vec![vec![LIST_LABEL.to_string(), SEARCH_LABEL.to_string()]];
    if state.library.allowed_special(user_id).await? {
        rows.push(vec![SPECIAL_LABEL.to_string()]);
    }
    Ok(Markup::Menu(rows))
}

/// `/start`: idempotent registration, welcome, best-effort pin.
pub async fn start(state: &AppState, chat: ChatId, from: UserId) -> anyhow::Result<()> {
    if !state.library.ensure_user(from).await {
        anyhow::bail!("user registration failed");
    }

    let menu = main_menu_for(state, from).await?;
    let sent = state
        .transport
        .send_message(chat, WELCOME, Some(menu))
        .await?;

    best_effort(
        "pin welcome message",
        state.transport.pin_message(chat, sent).await,
    );
    Ok(())
}

/// `/kexer`: arm the PIN-entry session.
pub async fn pin_prompt(state: &AppState, chat: ChatId) -> anyhow::Result<()> {
    state.sessions.set(chat, Session::PinEntry);
    state
        .transport
        .send_message(chat, "🔑 Enter the special PIN:", None)
        .await?;
    Ok(())
}

/// PIN entry. A wrong PIN leaves the session armed for another attempt.
pub async fn check_pin(
    state: &AppState,
    chat: ChatId,
    from: UserId,
    text: &str,
) -> anyhow::Result<()> {
    if text != state.config.special_pin {
        state
            .transport
            .send_message(chat, "❌ Wrong PIN.", None)
            .await?;
        return Ok(());
    }

    if !state.library.grant_special(from).await {
        anyhow::bail!("granting special access failed");
    }
    state.sessions.clear(chat);
    info!("🔓 Special access granted to user {}", from);

    let menu = main_menu_for(state, from).await?;
    state
        .transport
        .send_message(chat, "✅ PIN accepted!", Some(menu))
        .await?;
    Ok(())
}
