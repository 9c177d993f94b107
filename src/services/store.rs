//! Persistence gateway used by the ingest orchestrator

use std::future::Future;

use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{samples, versions};
use crate::models::{MetadataVersion, StoredVersion, ViewSample};
use crate::services::error::PersistenceError;

/// Reads and append-only writes for video metadata and view samples, scoped
/// to one unit of work that ends in exactly one `commit` or `rollback`.
///
/// Both writes ignore primary-key conflicts, so replaying them is harmless.
pub trait VideoStore {
    fn latest_version(
        &mut self,
        video_id: &str,
    ) -> impl Future<Output = Result<Option<StoredVersion>, PersistenceError>> + Send;

    fn insert_version(
        &mut self,
        version: &MetadataVersion,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    fn insert_sample(
        &mut self,
        sample: &ViewSample,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Make every write since the store was opened durable
    fn commit(self) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    /// Discard every write since the store was opened
    fn rollback(self) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// PostgreSQL store that keeps every write of a run inside one transaction
pub struct PgVideoStore {
    tx: Transaction<'static, Postgres>,
}

impl PgVideoStore {
    pub async fn begin(pool: &PgPool) -> Result<Self, PersistenceError> {
        let tx = pool
            .begin()
            .await
            .map_err(|e| PersistenceError::new("begin", e))?;
        Ok(Self { tx })
    }
}

impl VideoStore for PgVideoStore {
    async fn latest_version(
        &mut self,
        video_id: &str,
    ) -> Result<Option<StoredVersion>, PersistenceError> {
        versions::get_latest_version(&mut *self.tx, video_id)
            .await
            .map_err(|e| PersistenceError::new("latest_version", e))
    }

    async fn insert_version(&mut self, version: &MetadataVersion) -> Result<(), PersistenceError> {
        let written = versions::insert_version(&mut *self.tx, version)
            .await
            .map_err(|e| PersistenceError::new("insert_version", e))?;
        if !written {
            tracing::debug!(
                video_id = %version.video_id,
                version = version.version,
                "Metadata version already present"
            );
        }
        Ok(())
    }

    async fn insert_sample(&mut self, sample: &ViewSample) -> Result<(), PersistenceError> {
        samples::insert_sample(&mut *self.tx, sample)
            .await
            .map_err(|e| PersistenceError::new("insert_sample", e))?;
        Ok(())
    }

    async fn commit(self) -> Result<(), PersistenceError> {
        self.tx
            .commit()
            .await
            .map_err(|e| PersistenceError::new("commit", e))
    }

    async fn rollback(self) -> Result<(), PersistenceError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| PersistenceError::new("rollback", e))
    }
}
