use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::{CatalogStore, MemoryCatalogStore, PgCatalogStore};
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Keep the catalog in process memory instead of Postgres")]
    pub memory: bool,

    #[arg(long, help = "Do not apply migrations on startup")]
    pub no_migrate: bool,
}

pub async fn handle(config: AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    let store: Arc<dyn CatalogStore> = if args.memory {
        warn!("Using in-memory catalog store; data is lost on exit");
        Arc::new(MemoryCatalogStore::new())
    } else {
        let pg = PgCatalogStore::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        if !args.no_migrate {
            pg.migrate().await.context("failed to apply migrations")?;
        }
        Arc::new(pg)
    };

    let bind_addr = config.server.bind_addr();
    let state = AppState::new(config, store);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Catalog API listening on http://{}", bind_addr);

    axum::serve(listener, crate::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Catalog API stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal, initiating shutdown"),
        _ = terminate => info!("Received SIGTERM signal, initiating shutdown"),
    }
}
