//! View samples - DB queries for the `youtube_video_data` table

use sqlx::{Executor, Postgres};

use crate::models::ViewSample;

/// Record one view-count observation. Conflicts on (timestamp, id) are
/// ignored; returns whether a row was written.
pub async fn insert_sample<'e, E>(executor: E, sample: &ViewSample) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO youtube_video_data (video_id, views, "timestamp", metadata_version)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT ("timestamp", id) DO NOTHING
        "#,
    )
    .bind(&sample.video_id)
    .bind(sample.views)
    .bind(sample.timestamp)
    .bind(sample.metadata_version)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}
