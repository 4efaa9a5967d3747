use crate::config::{FILES_PER_PAGE, SEARCH_RESULT_LIMIT};
use crate::models::FileRecord;
use crate::services::session::Session;
use crate::transport::{Button, ChatId, Markup};
use crate::AppState;

pub(crate) struct PageView<'a> {
    pub items: &'a [FileRecord],
    pub has_prev: bool,
    pub has_next: bool,
}

/// Window of `FILES_PER_PAGE` rows at `page`, with pagination controls.
pub(crate) fn paginate(rows: &[FileRecord], page: usize) -> PageView<'_> {
    let start = (page * FILES_PER_PAGE).min(rows.len());
    let end = (start + FILES_PER_PAGE).min(rows.len());
    PageView {
        items: &rows[start..end],
        has_prev: start > 0,
        has_next: end < rows.len(),
    }
}

/// Case-insensitive substring match on title or tags.
pub(crate) fn matches_keyword(file: &FileRecord, keyword: &str) -> bool {
    file.title.to_lowercase().contains(keyword) || file.tags.to_lowercase().contains(keyword)
}

fn file_button(file: &FileRecord) -> Button {
    let lock = if file.special { " 🔒" } else { "" };
    Button::new(format!("{}{}", file.title, lock), format!("get_{}", file.id))
}

/// Paginated button list of approved files in one tier, newest first.
/// The administrator's chat additionally gets a remove button per file.
pub async fn send_list(
    state: &AppState,
    chat: ChatId,
    page: usize,
    special: bool,
) -> anyhow::Result<()> {
    let rows = state.library.approved_files(special).await?;
    if rows.is_empty() {
        state.transport.send_message(chat, "📂 No files.", None).await?;
        return Ok(());
    }

    let view = paginate(&rows, page);
    let is_admin = state.config.has_admin() && chat == state.config.admin_id;

    let mut keyboard: Vec<Vec<Button>> = Vec::new();
    for file in view.items {
        keyboard.push(vec![file_button(file)]);
        if is_admin {
            keyboard.push(vec![Button::new("🗑️ Remove", format!("delete_{}", file.id))]);
        }
    }

    let sp = if special { 1 } else { 0 };
    let mut nav = Vec::new();
    if view.has_prev {
        nav.push(Button::new("⬅️ Prev", format!("page_{}_{}", page - 1, sp)));
    }
    if view.has_next {
        nav.push(Button::new("➡️ Next", format!("page_{}_{}", page + 1, sp)));
    }
    if !nav.is_empty() {
        keyboard.push(nav);
    }

    state
        .transport
        .send_message(
            chat,
            &format!("📚 Files (Page {})", page + 1),
            Some(Markup::Inline(keyboard)),
        )
        .await?;
    Ok(())
}

/// Arm the search session and ask for a keyword.
pub async fn search_prompt(state: &AppState, chat: ChatId) -> anyhow::Result<()> {
    state.sessions.set(chat, Session::Search);
    state
        .transport
        .send_message(chat, "🔎 Enter a keyword:", None)
        .await?;
    Ok(())
}

/// Search all approved files, special ones included; the access gate applies
/// at delivery time, not here.
pub async fn run_search(state: &AppState, chat: ChatId, keyword: &str) -> anyhow::Result<()> {
    state.sessions.clear(chat);
    let keyword = keyword.to_lowercase();

    let rows = state.library.all_approved().await?;
    let hits: Vec<&FileRecord> = rows
        .iter()
        .filter(|f| matches_keyword(f, &keyword))
        .take(SEARCH_RESULT_LIMIT)
        .collect();

    if hits.is_empty() {
        state.transport.send_message(chat, "❌ No results.", None).await?;
        return Ok(());
    }

    let keyboard: Vec<Vec<Button>> = hits.iter().map(|f| vec![file_button(f)]).collect();
    state
        .transport
        .send_message(chat, "🔍 Results:", Some(Markup::Inline(keyboard)))
        .await?;
    Ok(())
}
