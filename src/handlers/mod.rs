pub mod access;
pub mod admin;
pub mod browse;
pub mod delivery;
pub mod upload;

use crate::services::session::{Session, UploadStep};
use crate::transport::{best_effort, ChatId, Event};
use crate::AppState;
use tracing::error;

pub const LIST_LABEL: &str = "📂 List Files";
pub const SEARCH_LABEL: &str = "🔍 Search Files";
pub const SPECIAL_LABEL: &str = "🔒 Special Files";

const APOLOGY: &str = "⚠️ Unexpected error occurred. Please try again later.";

/// Route one inbound event to its flow.
///
/// Unexpected failures are logged with context and converted into a generic
/// apology; a single bad event never takes down the dispatch loop.
pub async fn dispatch(state: &AppState, event: Event) {
    let chat = match &event {
        Event::Message { chat, .. } => *chat,
        Event::Callback { chat, .. } => *chat,
    };

    if let Err(e) = route(state, event).await {
        error!("[HANDLER ERROR] chat={}: {:#}", chat, e);
        best_effort(
            "apology message",
            state
                .transport
                .send_message(chat, APOLOGY, None)
                .await
                .map(|_| ()),
        );
    }
}

/// Fixed priority order: explicit command > session-state mode > menu label;
/// callbacks match on their data prefix.
async fn route(state: &AppState, event: Event) -> anyhow::Result<()> {
    match event {
        Event::Message {
            chat,
            from,
            text: _,
            document: Some(file_handle),
        } => {
            // A document always (re)starts the wizard, whatever was pending.
            upload::begin(state, chat, from, file_handle).await
        }

        Event::Message {
            chat,
            from,
            text: Some(text),
            ..
        } => route_text(state, chat, from, text).await,

        Event::Message { .. } => Ok(()),

        Event::Callback {
            id,
            chat,
            message,
            from,
            data,
        } => route_callback(state, &id, chat, message, from, &data).await,
    }
}

async fn route_text(state: &AppState, chat: ChatId, from: i64, text: String) -> anyhow::Result<()> {
    let trimmed = text.trim();

    if trimmed == "/start" || trimmed.starts_with("/start ") {
        return access::start(state, chat, from).await;
    }
    if trimmed == "/kexer" {
        return access::pin_prompt(state, chat).await;
    }

    match state.sessions.get(chat) {
        Some(Session::Upload(draft)) => match draft.step {
            UploadStep::Title => upload::set_title(state, chat, draft, trimmed).await,
            UploadStep::Tags => upload::set_tags(state, chat, draft, trimmed).await,
            // Waiting on the inline choice; stray text is ignored.
            UploadStep::SpecialChoice => Ok(()),
        },
        Some(Session::PinEntry) => access::check_pin(state, chat, from, trimmed).await,
        Some(Session::Search) => browse::run_search(state, chat, trimmed).await,
        None => match trimmed {
            LIST_LABEL => browse::send_list(state, chat, 0, false).await,
            SPECIAL_LABEL => browse::send_list(state, chat, 0, true).await,
            SEARCH_LABEL => browse::search_prompt(state, chat).await,
            _ => Ok(()),
        },
    }
}

async fn route_callback(
    state: &AppState,
    callback_id: &str,
    chat: ChatId,
    message: i64,
    from: i64,
    data: &str,
) -> anyhow::Result<()> {
    if let Some(id) = parse_id(data, "approve_") {
        admin::approve(state, callback_id, chat, message, from, id).await
    } else if let Some(id) = parse_id(data, "reject_") {
        admin::reject(state, callback_id, chat, message, from, id).await
    } else if data == "special_yes" || data == "special_no" {
        upload::finish(state, chat, from, data == "special_yes").await
    } else if let Some((page, special)) = parse_page(data) {
        browse::send_list(state, chat, page, special).await
    } else if let Some(id) = parse_id(data, "get_") {
        delivery::deliver(state, callback_id, chat, message, from, id).await
    } else if let Some(id) = parse_id(data, "delete_") {
        admin::remove(state, callback_id, chat, message, from, id).await
    } else {
        Ok(())
    }
}

fn parse_id(data: &str, prefix: &str) -> Option<i64> {
    data.strip_prefix(prefix)?.parse().ok()
}

/// Pagination payload: `page_{index}_{0|1}` with the special-flag context.
fn parse_page(data: &str) -> Option<(usize, bool)> {
    let rest = data.strip_prefix("page_")?;
    let (page, special) = rest.split_once('_')?;
    Some((page.parse().ok()?, special == "1"))
}
