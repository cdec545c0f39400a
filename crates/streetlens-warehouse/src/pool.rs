//! Warehouse connection pool.
//!
//! The warehouse is somebody else's database: access is read-only and the
//! connection string comes from the environment, never the config file.

use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use tokio_postgres::NoTls;
use tracing::info;

use streetlens_common::error::{Result, StreetlensError};
use streetlens_config::{Config, WarehouseConfig};

/// Shared handle over the warehouse pool plus the configured table names.
#[derive(Clone)]
pub struct Warehouse {
    pool: Pool,
    pub(crate) config: WarehouseConfig,
}

impl Warehouse {
    /// Build the pool from the warehouse configuration. The connection
    /// string is resolved through the configured env var.
    pub fn connect(config: &WarehouseConfig) -> Result<Self> {
        let url = Config::resolve_secret(&config.url_env)?;
        let pg_config: tokio_postgres::Config = url
            .expose_secret()
            .parse()
            .map_err(|e| StreetlensError::Config(format!("invalid warehouse URL: {e}")))?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .build()
            .map_err(|e| StreetlensError::Config(format!("warehouse pool: {e}")))?;

        info!(max_connections = config.max_connections, "warehouse pool created");

        Ok(Self {
            pool,
            config: config.clone(),
        })
    }

    pub(crate) async fn client(&self) -> Result<Object> {
        self.pool
            .get()
            .await
            .map_err(|e| StreetlensError::Warehouse(format!("connection checkout: {e}")))
    }
}
