//! Database connection and transaction utilities
//!
//! Query functions in `crate::domain` are generic over sqlx's `Executor`, so
//! they accept both `&PgPool` and `&mut PgConnection`:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! domain::versions::insert_version(&mut *tx, &version).await?;
//! domain::samples::insert_sample(&mut *tx, &sample).await?;
//! tx.commit().await?;
//! ```
//!
//! An ingest run holds exactly one transaction (see `store::PgVideoStore`)
//! and releases it once, by commit or rollback.

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::services::error::PersistenceError;

/// Connect a single-connection pool. A run is strictly sequential, so one
/// connection is all it ever holds.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, PersistenceError> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| PersistenceError::new("connect", e))?;

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}
