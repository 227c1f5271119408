//! Server lifecycle: open the store, serve, shut down, hand the store back.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use collate::Collate;
use collate_store::{SqliteStore, Store};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::routes::router;

/// The Collate HTTP server.
pub struct Server<S: Store> {
    config: ServerConfig,
    collate: Arc<Collate<S>>,
}

impl Server<SqliteStore> {
    /// Open the SQLite store named by the config.
    ///
    /// Schema setup runs here, once, before any request is accepted.
    pub fn open(config: ServerConfig) -> Result<Self, ServerError> {
        let store = SqliteStore::open(&config.database)?;
        tracing::info!(database = %config.database.display(), "record store ready");
        Ok(Self::new(config, store))
    }
}

impl<S: Store + 'static> Server<S> {
    pub fn new(config: ServerConfig, store: S) -> Self {
        Self {
            config,
            collate: Arc::new(Collate::new(store)),
        }
    }

    /// The configured listen address.
    pub fn listen_addr(&self) -> SocketAddr {
        self.config.listen
    }

    /// Get the router (for testing)
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.collate))
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    ///
    /// Returns the store once every connection has finished, so the caller
    /// can close it. `None` means a handle was still shared and the store
    /// will close when that handle drops.
    pub async fn run<F>(self, shutdown: F) -> Result<Option<S>, ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.listen).await?;
        self.run_on(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn run_on<F>(self, listener: TcpListener, shutdown: F) -> Result<Option<S>, ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(addr = %listener.local_addr()?, "collate server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        match Arc::try_unwrap(self.collate) {
            Ok(collate) => Ok(Some(collate.into_store())),
            Err(_) => {
                tracing::warn!("service still referenced after shutdown");
                Ok(None)
            }
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
