use bookdrop::config::BotConfig;
use bookdrop::infrastructure::database;
use bookdrop::transport::telegram::TelegramApi;
use bookdrop::transport::Transport;
use bookdrop::{run_bot, status, AppState};
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookdrop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting bookdrop...");

    let started = Instant::now();
    let config = BotConfig::from_env()?;
    if !config.has_admin() {
        warn!("ADMIN_ID not set; upload approval routing is disabled");
    }

    let db = database::setup_database(&config.database_url).await?;

    let api = Arc::new(TelegramApi::new(&config.api_token));
    let transport: Arc<dyn Transport> = api.clone();

    let status_port = config.status_port;
    tokio::spawn(async move {
        if let Err(e) = status::serve(started, status_port).await {
            warn!("Status page stopped: {}", e);
        }
    });

    let state = AppState::new(db, transport, config);
    run_bot(state, api).await;

    Ok(())
}
