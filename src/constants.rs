//! Application constants

/// Maximum stored title length, in characters
pub const MAX_TITLE_LENGTH: usize = 255;

/// Default number of recent videos pulled per run
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Upper bound the search endpoint accepts for `maxResults`
pub const MAX_RESULTS_CAP: u32 = 50;

/// YouTube Data API v3 base URL
pub const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Search result kind for actual uploads (as opposed to playlists or channels)
pub const YOUTUBE_VIDEO_KIND: &str = "youtube#video";

/// Default PostgreSQL port
pub const DEFAULT_DB_PORT: u16 = 5432;
