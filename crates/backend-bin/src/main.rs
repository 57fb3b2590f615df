use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use jobboard_backend_lib::{
    config::{Settings, StorageBackend},
    logging,
    router,
    storage::{FlatFileStorage, MemoryStorage},
    AppState, SharedClock,
};
use tokio::net::TcpListener;

/// Job board HTTP server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(Some(&args.config))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    logging::init_tracing(&settings)?;
    logging::warn_insecure_defaults(&settings);

    let clock: SharedClock = Arc::new(mockable::DefaultClock);
    let state = match settings.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage; data is lost on exit");
            AppState::new(Arc::new(MemoryStorage::new()), settings.clone(), clock)?
        },
        StorageBackend::File => {
            let storage = FlatFileStorage::new(&settings.storage.data_dir).with_context(|| {
                format!("opening data directory {}", settings.storage.data_dir.display())
            })?;
            tracing::info!(data_dir = %settings.storage.data_dir.display(), "using flat-file storage");
            AppState::new(Arc::new(storage), settings.clone(), clock)?
        },
    };

    let app = router::create_router(Arc::new(state))?;

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    tracing::info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
