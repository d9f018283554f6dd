#[cfg(feature = "postgres")]
use std::sync::Arc;
#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the main database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Pooled connection to the blog database.
///
/// # Example
/// ```ignore
/// let connections = DatabaseConnections::init(&config).await?;
/// let users = PostgresUserRepository::new(connections.main.clone());
/// ```
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    /// Shared by every repository; the pool itself is behind this handle.
    pub main: Arc<DbConn>,
}

/// Placeholder when built without a database backend.
#[cfg(not(feature = "postgres"))]
pub struct DatabaseConnections;

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the connection pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!(pool = config.max_connections, "Main database connected");

        Ok(Self {
            main: Arc::new(main),
        })
    }

    /// Whether the database answers within the pool's timeouts.
    pub async fn ping(&self) -> bool {
        match self.main.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Database ping failed");
                false
            }
        }
    }
}

#[cfg(not(feature = "postgres"))]
impl DatabaseConnections {
    pub async fn ping(&self) -> bool {
        false
    }
}
