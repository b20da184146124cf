//! GopherNet Server
//!
//! HTTP surface and process lifecycle: wires the store, service and
//! scheduler together, serves the burrow API, and on shutdown stops the
//! jobs and writes one last snapshot.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod logging;

use config::{ConfigError, ServiceConfig};
use gophernet_scheduler::{Scheduler, SchedulerError};
use gophernet_service::{BurrowService, GopherNetService};
use gophernet_store::MemoryStore;
use handlers::{create_router, AppState};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server binding error
    #[error("Failed to bind server on {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Scheduler could not be started
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Logger could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the production service over the given state file
pub fn build_service(config: &ServiceConfig, data_file: PathBuf) -> Arc<dyn BurrowService> {
    let store = MemoryStore::new(data_file, config.files.report_file.clone());
    Arc::new(GopherNetService::new(store))
}

/// Start the GopherNet server
///
/// Loads the initial state, binds the listener and serves until Ctrl+C
/// or SIGTERM. A state file that cannot be loaded is logged and the
/// server starts with an empty catalog; a listener that cannot bind is
/// fatal.
pub async fn start_server(config: ServiceConfig, data_file: PathBuf) -> Result<(), ServerError> {
    info!("Starting GopherNet");
    info!(data_file = %data_file.display(), report_file = %config.files.report_file.display(), "Files");

    let service = build_service(&config, data_file);
    if let Err(e) = service.load_initial_state() {
        error!(error = %e, "Failed to load initial state");
    }

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve(listener, service, &config, shutdown_signal()).await
}

/// Serve requests on `listener` until `shutdown` resolves
///
/// Starts the scheduled jobs first. When `shutdown` resolves the listener
/// stops accepting, and in-flight connections drain while the jobs are
/// cancelled and joined. Both are bounded by the configured shutdown
/// timeout; connections still open after it are dropped. The state is
/// then saved one final time.
pub async fn serve<F>(
    listener: TcpListener,
    service: Arc<dyn BurrowService>,
    config: &ServiceConfig,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let routes = config.routes()?;

    let mut scheduler = Scheduler::new(Arc::clone(&service));
    scheduler.start_all(&config.scheduler)?;

    let app = create_router(
        AppState {
            service: Arc::clone(&service),
        },
        &routes,
    );

    if let Ok(local) = listener.local_addr() {
        info!(addr = %local, "GopherNet listening");
    }

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    // A server that exits on its own still goes through the shutdown sequence
    let early_exit = tokio::select! {
        _ = shutdown => None,
        joined = &mut server => Some(joined),
    };

    info!("Shutting down server...");
    let _ = stop_tx.send(());

    let timeout = config.server.shutdown_timeout();
    let drain = async move {
        match early_exit {
            Some(joined) => joined,
            None => drain_server(server, timeout).await,
        }
    };

    let (served, jobs) = tokio::join!(drain, scheduler.shutdown(timeout));

    if let Err(e) = jobs {
        warn!(error = %e, "Scheduled jobs did not stop cleanly");
    }

    let final_save = tokio::task::spawn_blocking(move || service.save_state()).await;
    match final_save {
        Ok(Ok(())) => info!("Final state saved"),
        Ok(Err(e)) => error!(error = %e, "Error saving state during shutdown"),
        Err(e) => error!(error = %e, "Final state save did not complete"),
    }

    match served {
        Ok(result) => result.map_err(|e| ServerError::Server(e.to_string()))?,
        Err(e) => return Err(ServerError::Server(e.to_string())),
    }

    info!("Server shut down cleanly");
    Ok(())
}

/// Wait up to `timeout` for open connections, then drop them
async fn drain_server(
    mut server: JoinHandle<std::io::Result<()>>,
    timeout: Duration,
) -> Result<std::io::Result<()>, JoinError> {
    match tokio::time::timeout(timeout, &mut server).await {
        Ok(joined) => joined,
        Err(_) => {
            warn!(?timeout, "Connections still open at shutdown deadline, closing them");
            server.abort();
            Ok(Ok(()))
        }
    }
}

/// Resolve on Ctrl+C or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
