//! Shared data models used across modules

use chrono::{DateTime, Utc};
use sqlx::postgres::types::PgInterval;

/// A raw video record as returned by the fetch client, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    /// ISO-8601 duration, e.g. `PT1H2M35S`. Empty when the API omitted it.
    pub duration: String,
    pub view_count: Option<String>,
    /// ISO-8601 instant, e.g. `2024-12-09T10:30:00Z`
    pub published_at: String,
}

/// Video length as a whole number of seconds.
///
/// Equality is on the total, so `PT90M` and `PT1H30M` compare equal. This is
/// the same comparison PostgreSQL applies to a round-tripped `INTERVAL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VideoDuration {
    total_seconds: i64,
}

impl VideoDuration {
    pub const ZERO: VideoDuration = VideoDuration { total_seconds: 0 };

    pub fn from_secs(total_seconds: i64) -> Self {
        Self { total_seconds }
    }

    /// Build from components. Returns `None` when the total would not fit an
    /// `INTERVAL`'s microsecond field, so every value round-trips through storage.
    pub fn from_hms(hours: i64, minutes: i64, seconds: i64) -> Option<Self> {
        let total = hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)?;
        total.checked_mul(1_000_000)?;
        Some(Self::from_secs(total))
    }

    #[cfg(test)]
    pub fn total_seconds(&self) -> i64 {
        self.total_seconds
    }

    pub fn hours(&self) -> i64 {
        self.total_seconds / 3600
    }

    pub fn minutes(&self) -> i64 {
        (self.total_seconds % 3600) / 60
    }

    pub fn seconds(&self) -> i64 {
        self.total_seconds % 60
    }

    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }

    /// Convert to the value bound into an `INTERVAL` column
    pub fn to_pg_interval(&self) -> PgInterval {
        PgInterval {
            months: 0,
            days: 0,
            microseconds: self.total_seconds.saturating_mul(1_000_000),
        }
    }

    /// Read back an `INTERVAL` column. Months count as 30 days, matching
    /// PostgreSQL's own `justify_interval` convention.
    pub fn from_pg_interval(interval: &PgInterval) -> Self {
        let days = i64::from(interval.months) * 30 + i64::from(interval.days);
        Self::from_secs(days * 86_400 + interval.microseconds / 1_000_000)
    }
}

impl std::fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

/// A video with every field converted into its canonical, comparable form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVideo {
    pub id: String,
    pub title: String,
    pub duration: VideoDuration,
    pub view_count: i64,
    pub published_at: DateTime<Utc>,
}

/// The most recent `video_metadata` row for one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVersion {
    pub title: String,
    pub duration: VideoDuration,
    pub published_at: DateTime<Utc>,
    pub version: i32,
}

impl StoredVersion {
    /// Exact field-wise comparison against a freshly normalized video
    pub fn matches(&self, video: &NormalizedVideo) -> bool {
        self.title == video.title
            && self.duration == video.duration
            && self.published_at == video.published_at
    }
}

/// A new `video_metadata` row. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataVersion {
    pub video_id: String,
    pub title: String,
    pub duration: VideoDuration,
    pub published_at: DateTime<Utc>,
    pub version: i32,
}

impl MetadataVersion {
    pub fn from_video(video: &NormalizedVideo, version: i32) -> Self {
        Self {
            video_id: video.id.clone(),
            title: video.title.clone(),
            duration: video.duration,
            published_at: video.published_at,
            version,
        }
    }

    #[cfg(test)]
    pub fn as_stored(&self) -> StoredVersion {
        StoredVersion {
            title: self.title.clone(),
            duration: self.duration,
            published_at: self.published_at,
            version: self.version,
        }
    }
}

/// One view-count observation, stamped with the run start time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSample {
    pub video_id: String,
    pub views: i64,
    pub timestamp: DateTime<Utc>,
    pub metadata_version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_components_are_canonical() {
        let d = VideoDuration::from_hms(0, 90, 5).unwrap();
        assert_eq!((d.hours(), d.minutes(), d.seconds()), (1, 30, 5));
        assert_eq!(d, VideoDuration::from_hms(1, 30, 5).unwrap());
        assert_eq!(d.to_string(), "01:30:05");
    }

    #[test]
    fn test_duration_interval_round_trip() {
        let d = VideoDuration::from_hms(2, 0, 1).unwrap();
        assert_eq!(VideoDuration::from_pg_interval(&d.to_pg_interval()), d);

        let day_based = PgInterval {
            months: 0,
            days: 1,
            microseconds: 5_000_000,
        };
        assert_eq!(
            VideoDuration::from_pg_interval(&day_based).total_seconds(),
            86_405
        );
    }

    #[test]
    fn test_from_hms_overflow() {
        assert!(VideoDuration::from_hms(i64::MAX, 0, 0).is_none());
    }

    #[test]
    fn test_from_hms_rejects_values_an_interval_cannot_hold() {
        let max_secs = i64::MAX / 1_000_000;

        let largest = VideoDuration::from_hms(0, 0, max_secs).unwrap();
        assert_eq!(VideoDuration::from_pg_interval(&largest.to_pg_interval()), largest);

        assert!(VideoDuration::from_hms(0, 0, max_secs + 1).is_none());
        assert!(VideoDuration::from_hms(9_999_999_999_999, 0, 0).is_none());
    }
}
