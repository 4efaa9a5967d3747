use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

pub fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let rem = secs % 3600;
    format!("{}h {}m {}s", hours, rem / 60, rem % 60)
}

fn render_page(uptime_secs: u64) -> String {
    format!(
        r#"<html>
  <head><title>📚 Bot Status</title></head>
  <body style="font-family: Arial; text-align: center; margin-top: 50px;">
    <h1>🤖 E-Books Sharing Bot</h1>
    <p style="font-size:18px;">✅ Bot is running!</p>
    <p>⏱️ Uptime: {}</p>
  </body>
</html>"#,
        format_uptime(uptime_secs)
    )
}

/// The liveness surface: one route, human-readable, nothing else.
pub fn status_router(started: Instant) -> Router {
    Router::new().route(
        "/",
        get(move || async move { Html(render_page(started.elapsed().as_secs())) }),
    )
}

pub async fn serve(started: Instant, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("✅ Status page ready at http://{}", addr);
    axum::serve(listener, status_router(started)).await?;
    Ok(())
}
