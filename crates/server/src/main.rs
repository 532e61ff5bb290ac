//! sentio server entry point.
//!
//! Boots the review-analysis server on stdio transport. Logging goes to
//! stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

use sentio_core::{AppConfig, ReviewStore};

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let store = ReviewStore::open(&config.db_path).await?;

    // Select the sentiment backend once, up front: a heavyweight model load
    // happens here rather than inside the first request.
    let backend = sentio_core::sentiment::selected_backend(&config).await;
    tracing::info!(backend = backend.name(), "starting sentio server on stdio transport");

    let handler = handler::SentioServer::new(config, store);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
