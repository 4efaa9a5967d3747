use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Step marker for the upload wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStep {
    Title,
    Tags,
    SpecialChoice,
}

/// In-progress upload, advanced one message at a time.
#[derive(Debug, Clone)]
pub struct UploadDraft {
    pub step: UploadStep,
    pub file_handle: String,
    pub title: String,
    pub tags: String,
    pub uploader: i64,
}

/// At most one active interaction per chat.
#[derive(Debug, Clone)]
pub enum Session {
    Upload(UploadDraft),
    Search,
    PinEntry,
}

/// Per-chat session state, process-local and transient.
///
/// Absence of an entry is the "no active session" case. Entries have no
/// timeout; a stale one persists until overwritten or cleared.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<i64, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chat_id: i64) -> Option<Session> {
        self.inner.lock().unwrap().get(&chat_id).cloned()
    }

    pub fn set(&self, chat_id: i64, session: Session) {
        self.inner.lock().unwrap().insert(chat_id, session);
    }

    pub fn clear(&self, chat_id: i64) {
        self.inner.lock().unwrap().remove(&chat_id);
    }
}
