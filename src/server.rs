//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, repository
//! backend (SeaORM with migrations, or in-memory), the REST API listener and
//! graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::TokenService;
use crate::infrastructure::database::migrator::Migrator;
use crate::interfaces::http::ApiContext;
use crate::shared::{listen_for_shutdown_signals, ShutdownSignal};
use crate::{create_api_router, init_database, InMemoryRepositoryProvider, SeaOrmRepositoryProvider};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// The global recorder can only be installed once per process; later calls
/// reuse its handle.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!("Metrics recorder unavailable, /metrics will stay empty: {}", e);
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Handle to a running service.
///
/// ```rust,no_run
/// use charger_directory::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address the API actually bound to
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, ServerError> {
        let app_cfg = opts.config;

        info!("Starting Charger Directory...");
        let prometheus = prometheus_handle();

        if app_cfg.uses_default_secret() {
            warn!("Using the default JWT secret; set security.jwt_secret or CHARGERS_JWT_SECRET");
        }

        // ── Repositories ───────────────────────────────────────
        let db_config = app_cfg.database_config();
        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            if db_config.is_memory() {
                warn!("Using in-memory repositories; data is lost on exit");
                (Arc::new(InMemoryRepositoryProvider::new()), None)
            } else {
                let db = init_database(&db_config).await?;
                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&db, None).await?;
                    info!("Migrations completed");
                }
                (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
            };

        let tokens = Arc::new(TokenService::new(&app_cfg.jwt_config()));

        // ── REST API ───────────────────────────────────────────
        let api_router = create_api_router(ApiContext {
            repos: repos.clone(),
            tokens,
            bcrypt_cost: app_cfg.security.bcrypt_cost,
            db: db.clone(),
            metrics: prometheus,
        });

        let api_addr = app_cfg.address();
        let listener = tokio::net::TcpListener::bind(&api_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: api_addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: api_addr.clone(),
            source,
        })?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API server received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for the API server to stop, then release the database.
    ///
    /// In-flight requests get `server.shutdown_timeout` seconds after the
    /// shutdown signal; the server task is aborted after that.
    pub async fn wait(self) {
        let grace = Duration::from_secs(self.config.server.shutdown_timeout);
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => {
                if let Err(e) = result {
                    error!("REST API server task panicked: {}", e);
                }
            }
            _ = async {
                self.shutdown.wait().await;
                tokio::time::sleep(grace).await;
            } => {
                warn!("Shutdown grace period of {:?} elapsed; aborting open connections", grace);
                api_task.abort();
            }
        }
        info!("REST API server stopped");

        if let Some(db) = self.db {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        }

        info!("Charger Directory shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down Charger Directory...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.server.shutdown_timeout = 1;
        config.database.url = "memory".to_string();
        ServerOptions {
            config,
            auto_migrate: true,
        }
    }

    #[tokio::test]
    async fn starts_and_stops_on_memory_backend() {
        let handle = ServerHandle::start(memory_options()).await.unwrap();
        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn migrates_sqlite_on_start() {
        let mut opts = memory_options();
        opts.config.database.url = "sqlite::memory:".to_string();
        opts.config.database.max_connections = 1;

        let handle = ServerHandle::start(opts).await.unwrap();
        assert!(handle
            .repos
            .users()
            .find_by_username("nobody")
            .await
            .unwrap()
            .is_none());

        handle.shutdown().await;
    }
}
