//! Environment-sourced configuration, loaded once at startup and passed
//! down by reference.

use std::str::FromStr;

use crate::constants::{
    DEFAULT_DB_PORT, DEFAULT_MAX_RESULTS, MAX_RESULTS_CAP, MAX_TITLE_LENGTH, YOUTUBE_API_BASE_URL,
};
use crate::services::error::ConfigError;
use crate::transform::TitlePolicy;

#[derive(Clone)]
pub struct Config {
    pub youtube: YouTubeConfig,
    pub database: DatabaseConfig,
    pub title_policy: TitlePolicy,
}

#[derive(Clone)]
pub struct YouTubeConfig {
    /// Env: `YOUTUBE_API_KEY`
    pub api_key: String,
    /// Env: `YOUTUBE_CHANNEL_ID`
    pub channel_id: String,
    /// Env: `YOUTUBE_MAX_RESULTS`, default 10, clamped to 1..=50
    pub max_results: u32,
    /// Env: `YOUTUBE_API_BASE_URL`
    pub base_url: String,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    /// Env: `DB_HOST`, default `localhost`
    pub host: String,
    /// Env: `DB_NAME`
    pub name: String,
    /// Env: `DB_USER`
    pub user: String,
    /// Env: `DB_PASSWORD`
    pub password: String,
    /// Env: `DB_PORT`, default 5432
    pub port: u16,
}

impl Config {
    /// Load from the process environment. A `.env` file in the working
    /// directory (or a parent) is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let requested: u32 = parse_or(
            "YOUTUBE_MAX_RESULTS",
            var("YOUTUBE_MAX_RESULTS"),
            DEFAULT_MAX_RESULTS,
        )?;
        let max_results = requested.clamp(1, MAX_RESULTS_CAP);
        if max_results != requested {
            tracing::warn!(requested, max_results, "YOUTUBE_MAX_RESULTS out of range, clamped");
        }

        let youtube = YouTubeConfig {
            api_key: required("YOUTUBE_API_KEY")?,
            channel_id: required("YOUTUBE_CHANNEL_ID")?,
            max_results,
            base_url: var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|| YOUTUBE_API_BASE_URL.to_string()),
        };

        let database = DatabaseConfig {
            host: var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            name: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            port: parse_or("DB_PORT", var("DB_PORT"), DEFAULT_DB_PORT)?,
        };

        let requested_title: usize = parse_or(
            "INGEST_TITLE_MAX_LENGTH",
            var("INGEST_TITLE_MAX_LENGTH"),
            MAX_TITLE_LENGTH,
        )?;
        // video_metadata.title is VARCHAR(255)
        let max_length = requested_title.clamp(1, MAX_TITLE_LENGTH);
        if max_length != requested_title {
            tracing::warn!(
                requested = requested_title,
                max_length,
                "INGEST_TITLE_MAX_LENGTH out of range, clamped"
            );
        }

        let title_policy = TitlePolicy {
            max_length,
            escape_quotes: parse_or(
                "INGEST_ESCAPE_TITLE_QUOTES",
                var("INGEST_ESCAPE_TITLE_QUOTES"),
                false,
            )?,
        };

        Ok(Config {
            youtube,
            database,
            title_policy,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const BASE: &[(&str, &str)] = &[
        ("YOUTUBE_API_KEY", "key"),
        ("YOUTUBE_CHANNEL_ID", "UC123"),
        ("DB_NAME", "youtube"),
        ("DB_USER", "ingest"),
        ("DB_PASSWORD", "secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(BASE).unwrap();
        assert_eq!(config.youtube.max_results, 10);
        assert_eq!(config.youtube.base_url, YOUTUBE_API_BASE_URL);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.title_policy, TitlePolicy::default());
    }

    #[test]
    fn test_max_results_is_clamped() {
        let mut pairs = BASE.to_vec();
        pairs.push(("YOUTUBE_MAX_RESULTS", "500"));
        assert_eq!(load(&pairs).unwrap().youtube.max_results, 50);

        let mut pairs = BASE.to_vec();
        pairs.push(("YOUTUBE_MAX_RESULTS", "0"));
        assert_eq!(load(&pairs).unwrap().youtube.max_results, 1);
    }

    #[test]
    fn test_missing_required_key() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DB_PASSWORD")
            .collect();
        assert!(matches!(load(&pairs), Err(ConfigError::Missing("DB_PASSWORD"))));

        let mut pairs = BASE.to_vec();
        pairs.retain(|(k, _)| *k != "YOUTUBE_API_KEY");
        pairs.push(("YOUTUBE_API_KEY", "  "));
        assert!(matches!(load(&pairs), Err(ConfigError::Missing("YOUTUBE_API_KEY"))));
    }

    #[test]
    fn test_invalid_number() {
        let mut pairs = BASE.to_vec();
        pairs.push(("DB_PORT", "postgres"));
        assert!(matches!(
            load(&pairs),
            Err(ConfigError::Invalid { key: "DB_PORT", .. })
        ));
    }

    #[test]
    fn test_title_policy_overrides() {
        let mut pairs = BASE.to_vec();
        pairs.push(("INGEST_TITLE_MAX_LENGTH", "100"));
        pairs.push(("INGEST_ESCAPE_TITLE_QUOTES", "true"));
        let policy = load(&pairs).unwrap().title_policy;
        assert_eq!(policy.max_length, 100);
        assert!(policy.escape_quotes);
    }

    #[test]
    fn test_title_max_length_is_clamped() {
        let mut pairs = BASE.to_vec();
        pairs.push(("INGEST_TITLE_MAX_LENGTH", "1000"));
        assert_eq!(load(&pairs).unwrap().title_policy.max_length, 255);

        let mut pairs = BASE.to_vec();
        pairs.push(("INGEST_TITLE_MAX_LENGTH", "0"));
        assert_eq!(load(&pairs).unwrap().title_policy.max_length, 1);
    }
}
