//! Collate server entry point.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use collate_server::{shutdown_signal, Cli, Server};
use collate_store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.load_config().context("loading configuration")?;
    let server = Server::<SqliteStore>::open(config).context("opening record store")?;

    if let Some(store) = server.run(shutdown_signal()).await? {
        store.close().context("closing record store")?;
    }

    tracing::info!("collate server stopped");
    Ok(())
}
