pub mod config;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod status;
pub mod transport;

use crate::config::BotConfig;
use crate::services::expiry::ExpiryScheduler;
use crate::services::library::LibraryService;
use crate::services::session::SessionStore;
use crate::transport::telegram::{next_backoff, TelegramApi, INITIAL_BACKOFF};
use crate::transport::Transport;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub library: LibraryService,
    pub sessions: SessionStore,
    pub transport: Arc<dyn Transport>,
    pub expiry: Arc<ExpiryScheduler>,
    pub config: BotConfig,
}

impl AppState {
    pub fn new(db: SqlitePool, transport: Arc<dyn Transport>, config: BotConfig) -> Self {
        Self {
            library: LibraryService::new(db),
            sessions: SessionStore::new(),
            expiry: Arc::new(ExpiryScheduler::new(transport.clone())),
            transport,
            config,
        }
    }
}

/// Long-poll loop driving all dispatch sequentially, one event at a time.
///
/// Transport failures back off exponentially (1 s doubling, capped at 120 s)
/// and retry forever; a successful poll resets the backoff.
pub async fn run_bot(state: AppState, api: Arc<TelegramApi>) {
    let mut offset = 0i64;
    let mut backoff = INITIAL_BACKOFF;

    info!("🚀 Bot polling started...");

    loop {
        match api.get_updates(offset).await {
            Ok(updates) => {
                backoff = INITIAL_BACKOFF;
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Some(event) = update.into_event() {
                        handlers::dispatch(&state, event).await;
                    }
                }
            }
            Err(e) => {
                warn!("[POLL ERROR] {}", e);
                tokio::time::sleep(backoff).await;
                backoff = next_backoff(backoff);
                warn!("[RETRY] next reconnect delay {}s", backoff.as_secs());
            }
        }
    }
}
