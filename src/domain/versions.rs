//! Video metadata versions - DB queries for the `video_metadata` table
//!
//! All functions use the generic Executor pattern, allowing them to work with
//! both `&PgPool` (for standalone queries) and `&mut PgConnection` (for transactions).

use chrono::{DateTime, Utc};
use sqlx::postgres::types::PgInterval;
use sqlx::{Executor, Postgres};

use crate::models::{MetadataVersion, StoredVersion, VideoDuration};

#[derive(Debug, sqlx::FromRow)]
struct VersionRow {
    title: String,
    duration: PgInterval,
    published_at: DateTime<Utc>,
    version: i32,
}

impl From<VersionRow> for StoredVersion {
    fn from(row: VersionRow) -> Self {
        StoredVersion {
            title: row.title,
            duration: VideoDuration::from_pg_interval(&row.duration),
            published_at: row.published_at,
            version: row.version,
        }
    }
}

/// Get the highest-numbered version stored for a video
pub async fn get_latest_version<'e, E>(
    executor: E,
    video_id: &str,
) -> Result<Option<StoredVersion>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: Option<VersionRow> = sqlx::query_as(
        r#"
        SELECT title, duration, published_at, version
        FROM video_metadata
        WHERE video_id = $1
        ORDER BY version DESC
        LIMIT 1
        "#,
    )
    .bind(video_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(StoredVersion::from))
}

/// Append a metadata version. An existing (video_id, version) row is left
/// untouched; returns whether a row was written.
pub async fn insert_version<'e, E>(
    executor: E,
    version: &MetadataVersion,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO video_metadata (video_id, title, duration, published_at, version)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (video_id, version) DO NOTHING
        "#,
    )
    .bind(&version.video_id)
    .bind(&version.title)
    .bind(version.duration.to_pg_interval())
    .bind(version.published_at)
    .bind(version.version)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}
