use std::sync::Arc;

use bookshelf::{AskamaTemplates, InMemoryBookStore};
use local_gateway::GatewayConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let adapter = bookshelf::app(Arc::new(InMemoryBookStore::new()), Arc::new(AskamaTemplates));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "local gateway listening");
    local_gateway::run(listener, Arc::new(adapter)).await?;
    Ok(())
}
