use reqwest::Client;
use serde::Deserialize;

use crate::constants::YOUTUBE_VIDEO_KIND;
use crate::models::VideoRecord;
use crate::services::error::FetchError;

#[derive(Clone)]
pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl YouTubeClient {
    /// `base_url` is normally [`YOUTUBE_API_BASE_URL`](crate::constants::YOUTUBE_API_BASE_URL)
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetch the channel's most recent uploads, newest first.
    ///
    /// One search call lists candidate ids, then one detail call per id. Any
    /// failure aborts the whole fetch; there is no partial result.
    pub async fn fetch_recent_videos(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<VideoRecord>, FetchError> {
        let video_ids = self.search_video_ids(channel_id, max_results).await?;
        tracing::info!(channel_id, found = video_ids.len(), "Search returned videos");

        let mut videos = Vec::with_capacity(video_ids.len());
        for video_id in &video_ids {
            let details = self.get_video_details(video_id).await?;
            if details.is_empty() {
                tracing::warn!(video_id = %video_id, "No details returned, skipping");
            }
            videos.extend(details);
        }

        Ok(videos)
    }

    /// Step 1: list recent upload ids for a channel, ordered by publish date
    async fn search_video_ids(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/search", self.base_url);
        let max_results = max_results.to_string();

        let text = self
            .get_text(
                &url,
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("maxResults", &max_results),
                    ("order", "date"),
                    ("type", "video"),
                ],
            )
            .await?;

        parse_search_response(&text)
    }

    /// Step 2: title, duration, view count and publish time for one video
    async fn get_video_details(&self, video_id: &str) -> Result<Vec<VideoRecord>, FetchError> {
        let url = format!("{}/videos", self.base_url);

        let text = self
            .get_text(
                &url,
                &[("part", "snippet,contentDetails,statistics"), ("id", video_id)],
            )
            .await?;

        parse_videos_response(&text)
    }

    async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String, FetchError> {
        let resp = self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    kind: String,
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    #[serde(default)]
    snippet: VideoSnippet,
    #[serde(default)]
    content_details: ContentDetails,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    published_at: String,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
}

impl From<VideoResource> for VideoRecord {
    fn from(v: VideoResource) -> Self {
        VideoRecord {
            id: v.id,
            title: v.snippet.title,
            duration: v.content_details.duration,
            view_count: v.statistics.view_count,
            published_at: v.snippet.published_at,
        }
    }
}

/// Extract video ids from a search response, dropping channels and playlists
fn parse_search_response(text: &str) -> Result<Vec<String>, FetchError> {
    let wrapper: SearchListResponse =
        serde_json::from_str(text).map_err(|source| FetchError::Decode {
            endpoint: "search",
            source,
        })?;

    Ok(wrapper
        .items
        .into_iter()
        .filter(|item| item.id.kind == YOUTUBE_VIDEO_KIND)
        .filter_map(|item| item.id.video_id)
        .collect())
}

fn parse_videos_response(text: &str) -> Result<Vec<VideoRecord>, FetchError> {
    let wrapper: VideoListResponse =
        serde_json::from_str(text).map_err(|source| FetchError::Decode {
            endpoint: "videos",
            source,
        })?;

    Ok(wrapper.items.into_iter().map(VideoRecord::from).collect())
}
