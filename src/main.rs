//! Tower quiz server (default binary).
//!
//! Serves the quiz engine to external UIs over the line-delimited JSON
//! adapter protocol. Configuration comes from `TOWER_QUIZ_*` environment
//! variables; log verbosity from `RUST_LOG`.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use tower_quiz::adapter::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if ServerConfig::is_disabled() {
        info!("server disabled via TOWER_QUIZ_DISABLED");
        return Ok(());
    }

    let config = ServerConfig::from_env();
    let catalog = config.load_catalog()?;
    info!(
        items = catalog.len(),
        categories = catalog.categories().len(),
        "catalog loaded"
    );

    run_server(config, Arc::new(catalog), None).await
}
