//! Berry Alert Pipeline - Server Entry Point

use anyhow::Result;
use api::{config::ServerConfig, init_logging, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("=== Berry Alert Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::load()?;
    run_server(config).await
}
