use crate::transport::{best_effort, ChatId, MessageId, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Countdown edits step by this many seconds, or the remainder if smaller.
const COUNTDOWN_STEP_SECS: u64 = 5;

/// Remaining-seconds values the countdown editor displays, in order.
pub fn countdown_steps(total: u64) -> Vec<u64> {
    let mut steps = Vec::new();
    let mut remaining = total;
    while remaining > 0 {
        steps.push(remaining);
        remaining -= COUNTDOWN_STEP_SECS.min(remaining);
    }
    steps
}

struct DeliveryTimers {
    countdown: JoinHandle<()>,
    deletion: JoinHandle<()>,
}

impl DeliveryTimers {
    fn is_finished(&self) -> bool {
        self.countdown.is_finished() && self.deletion.is_finished()
    }

    fn abort(&self) {
        self.countdown.abort();
        self.deletion.abort();
    }
}

/// Registry of per-delivery timer pairs, keyed by the delivered message.
///
/// Timers only touch message state, never stored file rows. They are
/// cancellable through the registry so a force-expire hook stays possible.
pub struct ExpiryScheduler {
    transport: Arc<dyn Transport>,
    tasks: Mutex<HashMap<(ChatId, MessageId), DeliveryTimers>>,
}

impl ExpiryScheduler {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Start the countdown editor on the placeholder and the delayed delete
    /// on the delivered document. Called only after a successful send.
    pub fn schedule(
        &self,
        chat: ChatId,
        status_message: MessageId,
        delivered_message: MessageId,
        title: &str,
        delay_secs: u64,
    ) {
        let countdown = tokio::spawn(run_countdown(
            self.transport.clone(),
            chat,
            status_message,
            title.to_string(),
            delay_secs,
        ));
        let deletion = tokio::spawn(run_delayed_delete(
            self.transport.clone(),
            chat,
            delivered_message,
            delay_secs,
        ));

        let mut tasks = self.tasks.lock().unwrap();
        if let Some(old) = tasks.insert((chat, delivered_message), DeliveryTimers { countdown, deletion }) {
            old.abort();
        }
    }

    /// Abort both timers for a delivery, if still registered.
    pub fn cancel(&self, chat: ChatId, delivered_message: MessageId) -> bool {
        match self.tasks.lock().unwrap().remove(&(chat, delivered_message)) {
            Some(timers) => {
                timers.abort();
                info!("⏹️  Cancelled expiry timers for message {} in chat {}", delivered_message, chat);
                true
            }
            None => false,
        }
    }

    /// Number of deliveries with registered timers.
    pub fn active(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Drop registry entries whose timers have both completed.
    pub fn reap(&self) {
        self.tasks.lock().unwrap().retain(|_, timers| !timers.is_finished());
    }
}

async fn run_countdown(
    transport: Arc<dyn Transport>,
    chat: ChatId,
    status_message: MessageId,
    title: String,
    delay_secs: u64,
) {
    for remaining in countdown_steps(delay_secs) {
        if let Err(e) = transport
            .edit_message_text(
                chat,
                status_message,
                &format!("📖 {title}\n⏳ This file will expire in {remaining}s"),
            )
            .await
        {
            debug!("countdown edit skipped: {}", e);
        }
        sleep(Duration::from_secs(COUNTDOWN_STEP_SECS.min(remaining))).await;
    }

    best_effort(
        "final countdown edit",
        transport
            .edit_message_text(chat, status_message, "⏳ File expired & removed.")
            .await,
    );
}

async fn run_delayed_delete(
    transport: Arc<dyn Transport>,
    chat: ChatId,
    delivered_message: MessageId,
    delay_secs: u64,
) {
    sleep(Duration::from_secs(delay_secs)).await;
    if let Err(e) = transport.delete_message(chat, delivered_message).await {
        error!("[AUTO-DELETE ERROR] chat={} message={}: {}", chat, delivered_message, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_steps_even() {
        assert_eq!(countdown_steps(15), vec![15, 10, 5]);
    }

    #[test]
    fn test_countdown_steps_remainder() {
        assert_eq!(countdown_steps(12), vec![12, 7, 2]);
    }

    #[test]
    fn test_countdown_steps_short() {
        assert_eq!(countdown_steps(3), vec![3]);
        assert!(countdown_steps(0).is_empty());
    }
}
