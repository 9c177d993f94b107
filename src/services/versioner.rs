//! Change detection for video metadata.
//!
//! Versions are an append-only log of observed metadata states. Any difference
//! in title, duration or publish date, however small, starts a new version.

use crate::models::{NormalizedVideo, StoredVersion};

/// Outcome of comparing a fetched video against its latest stored version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionDecision {
    /// Write a new `video_metadata` row at this version
    Insert { version: i32 },
    /// Metadata is unchanged; samples keep pointing at this version
    Reuse { version: i32 },
}

impl VersionDecision {
    /// The version the run's view sample should reference
    pub fn version(&self) -> i32 {
        match self {
            VersionDecision::Insert { version } | VersionDecision::Reuse { version } => *version,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, VersionDecision::Insert { .. })
    }
}

/// Decide whether `video` is a new version of what is stored.
///
/// Not atomic with the surrounding read and write: callers must process a
/// given video id from a single task.
pub fn resolve_version(video: &NormalizedVideo, latest: Option<&StoredVersion>) -> VersionDecision {
    match latest {
        None => VersionDecision::Insert { version: 1 },
        Some(stored) if stored.matches(video) => VersionDecision::Reuse {
            version: stored.version,
        },
        Some(stored) => VersionDecision::Insert {
            version: stored.version + 1,
        },
    }
}
