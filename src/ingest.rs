//! One ingest run: fetch, normalize, resolve versions, persist.
//!
//! Records are processed strictly in fetch order from a single task. A bad
//! publish date drops only its own record; any fetch or database failure
//! aborts the run and nothing is committed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::config::Config;
use crate::models::{MetadataVersion, VideoRecord, ViewSample};
use crate::services::error::{LogErr, ParseError, PersistenceError, RunError};
use crate::services::store::{PgVideoStore, VideoStore};
use crate::services::versioner::{VersionDecision, resolve_version};
use crate::transform::{TitlePolicy, normalize_record};
use crate::youtube::YouTubeClient;

/// Terminal state of a single record within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Persisted {
        id: String,
        decision: VersionDecision,
    },
    Dropped(DroppedRecord),
}

/// A record removed from the batch because its publish date did not parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    pub id: String,
    pub error: ParseError,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub fetched: usize,
    pub persisted: usize,
    pub versions_inserted: usize,
    pub versions_reused: usize,
    pub dropped: Vec<DroppedRecord>,
}

impl RunReport {
    fn new(started_at: DateTime<Utc>, fetched: usize) -> Self {
        Self {
            started_at,
            fetched,
            persisted: 0,
            versions_inserted: 0,
            versions_reused: 0,
            dropped: Vec::new(),
        }
    }

    fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Persisted { id, decision } => {
                tracing::debug!(video_id = %id, version = decision.version(), "Persisted");
                self.persisted += 1;
                if decision.is_insert() {
                    self.versions_inserted += 1;
                } else {
                    self.versions_reused += 1;
                }
            }
            RecordOutcome::Dropped(dropped) => self.dropped.push(dropped),
        }
    }
}

/// Take one record from fetched to persisted (or dropped).
pub async fn process_record<S: VideoStore>(
    store: &mut S,
    record: &VideoRecord,
    started_at: DateTime<Utc>,
    policy: &TitlePolicy,
) -> Result<RecordOutcome, PersistenceError> {
    let video = match normalize_record(record, policy) {
        Ok(video) => video,
        Err(error) => {
            tracing::warn!(video_id = %record.id, %error, "Dropping record");
            return Ok(RecordOutcome::Dropped(DroppedRecord {
                id: record.id.clone(),
                error,
            }));
        }
    };

    let latest = store.latest_version(&video.id).await?;
    let decision = resolve_version(&video, latest.as_ref());

    if let VersionDecision::Insert { version } = decision {
        store
            .insert_version(&MetadataVersion::from_video(&video, version))
            .await?;
        tracing::debug!(video_id = %video.id, version, "New metadata version");
    }

    store
        .insert_sample(&ViewSample {
            video_id: video.id.clone(),
            views: video.view_count,
            timestamp: started_at,
            metadata_version: decision.version(),
        })
        .await?;

    Ok(RecordOutcome::Persisted {
        id: video.id,
        decision,
    })
}

/// Process a fetched batch against `store`. Every sample shares `started_at`.
///
/// Returns on the first persistence error; the caller is responsible for
/// rolling back whatever was written before it.
pub async fn ingest_batch<S: VideoStore>(
    store: &mut S,
    records: &[VideoRecord],
    started_at: DateTime<Utc>,
    policy: &TitlePolicy,
) -> Result<RunReport, PersistenceError> {
    let mut report = RunReport::new(started_at, records.len());

    for record in records {
        let outcome = process_record(store, record, started_at, policy).await?;
        report.record(outcome);
    }

    Ok(report)
}

/// Process a batch inside `store`'s unit of work, then finish it: commit when
/// the batch completes (dropped records included), roll back on the first
/// persistence error.
pub async fn commit_batch<S: VideoStore>(
    mut store: S,
    records: &[VideoRecord],
    started_at: DateTime<Utc>,
    policy: &TitlePolicy,
) -> Result<RunReport, PersistenceError> {
    let result = ingest_batch(&mut store, records, started_at, policy).await;
    match result {
        Ok(report) => {
            store.commit().await.log_err("Failed to commit run")?;
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Error inserting video data, rolling back: {}", e);
            if let Err(rollback_err) = store.rollback().await {
                tracing::error!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// Perform a full run inside one transaction
pub async fn run(
    config: &Config,
    client: &YouTubeClient,
    pool: &PgPool,
) -> Result<RunReport, RunError> {
    let started_at = Utc::now();

    let records = client
        .fetch_recent_videos(&config.youtube.channel_id, config.youtube.max_results)
        .await
        .log_err("Failed to fetch videos from YouTube")?;
    tracing::info!(count = records.len(), "Fetched video records");

    let store = PgVideoStore::begin(pool).await?;
    let report = commit_batch(store, &records, started_at, &config.title_policy).await?;
    Ok(report)
}
