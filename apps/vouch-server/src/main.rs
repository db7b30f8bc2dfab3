mod backend;
mod config;
mod email;
mod error;
mod handlers;
mod server;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vouch_core::{LogDispatcher, NotificationDispatcher, ReferenceService};
use vouch_store_memory::MemoryStore;
use vouch_store_sqlite::SqliteStore;

use backend::StoreBackend;
use config::ServerConfig;
use email::EmailDispatcher;
use server::AppState;

#[derive(Parser)]
#[command(name = "vouch-server")]
#[command(about = "Reference invitation and submission service")]
struct Cli {
    /// Database URL (sqlite://path/to/db.db, or "memory" for an in-process
    /// store)
    #[arg(long, env = "DATABASE_URL", default_value = "memory")]
    database_url: String,

    /// Server address
    #[arg(long, env = "VOUCH_ADDR", default_value = "0.0.0.0:8080")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::from_env()?;

    let store = if cli.database_url == "memory" {
        info!("using in-memory store");
        StoreBackend::Memory(Arc::new(MemoryStore::new()))
    } else {
        info!(url = %cli.database_url, "using sqlite store");
        StoreBackend::Sqlite(Arc::new(SqliteStore::open(&cli.database_url).await?))
    };

    let notifier: Arc<dyn NotificationDispatcher> = match config.email {
        Some(ref email_config) => {
            let provider = email::create_provider(email_config)?;
            Arc::new(EmailDispatcher::new(provider, email_config.clone()))
        }
        None => {
            info!("no email provider configured; notifications go to the log");
            Arc::new(LogDispatcher)
        }
    };

    let service = Arc::new(ReferenceService::new(
        Arc::new(store),
        notifier,
        config.public_base_url.clone(),
    ));
    let state = AppState { service };

    let listener = tokio::net::TcpListener::bind(&cli.addr).await?;
    info!("serving vouch at http://{}", listener.local_addr()?);
    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
