use anyhow::Result;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::debug;

use crate::domain::{DomainError, DomainResult};
use crate::postgres::PostgresConfig;

/// Pooled connections to the database holding `users` and `role_permissions`.
///
/// Every failure past construction surfaces as
/// [`DomainError::StoreUnavailable`].
#[derive(Clone)]
pub struct PostgresClient {
    pool: Pool,
}

impl PostgresClient {
    /// Lazy: no connection is opened until the first checkout.
    pub fn new(config: &PostgresConfig) -> Result<Self> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.dbname = Some(config.database.clone());
        cfg.user = Some(config.username.clone());
        cfg.password = Some(config.password.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;
        pool.resize(config.max_pool_size);

        Ok(Self { pool })
    }

    /// Round trip used at startup so a bad DSN fails before the first check.
    pub async fn ping(&self) -> DomainResult<()> {
        let conn = self.get_connection().await?;
        conn.execute("SELECT 1", &[])
            .await
            .map_err(|e| DomainError::StoreUnavailable(format!("ping failed: {}", e)))?;
        debug!(max_size = self.pool.status().max_size, "permission store reachable");
        Ok(())
    }

    pub async fn get_connection(&self) -> DomainResult<deadpool_postgres::Client> {
        self.pool
            .get()
            .await
            .map_err(|e| DomainError::StoreUnavailable(format!("connection failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> PostgresConfig {
        PostgresConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..PostgresConfig::default()
        }
    }

    #[tokio::test]
    async fn test_new_does_not_connect() {
        assert!(PostgresClient::new(&unreachable_config()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_database_is_store_unavailable() {
        let client = PostgresClient::new(&unreachable_config()).unwrap();
        assert!(matches!(
            client.ping().await,
            Err(DomainError::StoreUnavailable(_))
        ));
    }
}
