mod config;
mod server;
mod static_assets;

use config::WebConfig;
use server::WebServer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,quill_core=info,quill_web=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(target = "quill_web", "Starting Quill blog generator");

    // Load configuration (defaults + env + optional TOML overlay)
    let cfg = WebConfig::load();

    WebServer::new(cfg).serve().await
}
