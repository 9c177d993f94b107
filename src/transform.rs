//! Field normalization for raw YouTube video records.
//!
//! Every rule here is total except [`normalize_published_at`]: missing or
//! garbled values collapse to a neutral default, while a malformed publish
//! date is reported so the caller can drop that single record.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::constants::MAX_TITLE_LENGTH;
use crate::models::{NormalizedVideo, VideoDuration, VideoRecord};
use crate::services::error::ParseError;

const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn duration_re() -> &'static Regex {
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();
    DURATION_RE.get_or_init(|| {
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("static regex is valid")
    })
}

fn published_at_re() -> &'static Regex {
    static PUBLISHED_AT_RE: OnceLock<Regex> = OnceLock::new();
    PUBLISHED_AT_RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("static regex is valid")
    })
}

/// How titles are prepared before comparison and storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitlePolicy {
    pub max_length: usize,
    /// Double single quotes before truncating. Only needed when comparing
    /// against rows written by a loader that interpolated titles into SQL.
    pub escape_quotes: bool,
}

impl Default for TitlePolicy {
    fn default() -> Self {
        Self {
            max_length: MAX_TITLE_LENGTH,
            escape_quotes: false,
        }
    }
}

/// Parse `PT[n]H[n]M[n]S` (any subset of components) into a duration.
///
/// Only the start of the string must match; trailing text is ignored. Anything
/// that does not start with `PT`, including day-based durations like `P1DT2H`
/// and the `P0D` the API reports for live streams, yields zero. So does a total
/// too large to store.
pub fn normalize_duration(raw: &str) -> VideoDuration {
    let Some(caps) = duration_re().captures(raw) else {
        return VideoDuration::ZERO;
    };

    let component = |i: usize| -> Option<i64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    match (component(1), component(2), component(3)) {
        (Some(h), Some(m), Some(s)) => VideoDuration::from_hms(h, m, s).unwrap_or_default(),
        _ => VideoDuration::ZERO,
    }
}

/// Parse a publish timestamp of the exact shape `YYYY-MM-DDTHH:MM:SSZ` as UTC
pub fn normalize_published_at(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    if !published_at_re().is_match(raw) {
        return Err(ParseError {
            raw: raw.to_string(),
            reason: format!("expected {}", PUBLISHED_AT_FORMAT),
        });
    }

    NaiveDateTime::parse_from_str(raw, PUBLISHED_AT_FORMAT)
        .map(|ndt| Utc.from_utc_datetime(&ndt))
        .map_err(|e| ParseError {
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a view count, falling back to 0 for missing, empty, non-numeric or
/// negative values
pub fn normalize_view_count(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .unwrap_or(0)
}

/// Double every single quote, then keep at most `max_length` characters
pub fn normalize_title(raw: &str, max_length: usize) -> String {
    truncate_title(&raw.replace('\'', "''"), max_length)
}

/// Keep at most `max_length` characters, discarding the remainder
pub fn truncate_title(raw: &str, max_length: usize) -> String {
    raw.chars().take(max_length).collect()
}

/// Apply every field rule to one fetched record
pub fn normalize_record(
    record: &VideoRecord,
    policy: &TitlePolicy,
) -> Result<NormalizedVideo, ParseError> {
    let published_at = normalize_published_at(&record.published_at)?;

    let title = if policy.escape_quotes {
        normalize_title(&record.title, policy.max_length)
    } else {
        truncate_title(&record.title, policy.max_length)
    };

    Ok(NormalizedVideo {
        id: record.id.clone(),
        title,
        duration: normalize_duration(&record.duration),
        view_count: normalize_view_count(record.view_count.as_deref()),
        published_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn hms(d: VideoDuration) -> (i64, i64, i64) {
        (d.hours(), d.minutes(), d.seconds())
    }

    #[test]
    fn test_duration_full_and_partial() {
        assert_eq!(hms(normalize_duration("PT1H2M35S")), (1, 2, 35));
        assert_eq!(hms(normalize_duration("PT45S")), (0, 0, 45));
        assert_eq!(hms(normalize_duration("PT3M")), (0, 3, 0));
        assert_eq!(hms(normalize_duration("PT2H")), (2, 0, 0));
        assert_eq!(hms(normalize_duration("PT1H5S")), (1, 0, 5));
    }

    #[test]
    fn test_duration_fallbacks() {
        assert!(normalize_duration("garbage").is_zero());
        assert!(normalize_duration("").is_zero());
        assert!(normalize_duration("P0D").is_zero());
        assert!(normalize_duration("P1DT2H").is_zero());
        assert!(normalize_duration(" PT5S").is_zero());
        assert!(normalize_duration("PT99999999999999999999S").is_zero());
        assert!(normalize_duration("PT9999999999999H").is_zero());
    }

    #[test]
    fn test_duration_matches_prefix_only() {
        assert_eq!(hms(normalize_duration("PT5Sjunk")), (0, 0, 5));
        assert_eq!(hms(normalize_duration("PT1H2M3S extra")), (1, 2, 3));
    }

    #[test]
    fn test_published_at_utc() {
        let dt = normalize_published_at("2024-12-09T10:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-12-09T10:30:00+00:00");
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_published_at_rejects_bad_shapes() {
        assert!(normalize_published_at("2024-13-01T00:00:00Z").is_err());
        assert!(normalize_published_at("2024-02-30T00:00:00Z").is_err());
        assert!(normalize_published_at("2024-12-09T10:30:00+02:00").is_err());
        assert!(normalize_published_at("2024-12-09T10:30:00.000Z").is_err());
        assert!(normalize_published_at("2024-12-09").is_err());
        assert!(normalize_published_at("").is_err());
    }

    #[test]
    fn test_view_count() {
        assert_eq!(normalize_view_count(Some("12345")), 12345);
        assert_eq!(normalize_view_count(Some(" 42 ")), 42);
        assert_eq!(normalize_view_count(Some("")), 0);
        assert_eq!(normalize_view_count(Some("n/a")), 0);
        assert_eq!(normalize_view_count(Some("-3")), 0);
        assert_eq!(normalize_view_count(None), 0);
    }

    #[test]
    fn test_title_escapes_and_truncates() {
        let title = normalize_title("O'Brien's Vlog", 255);
        assert_eq!(title, "O''Brien''s Vlog");
        assert!(title.chars().count() <= 255);

        let long = "é".repeat(300);
        assert_eq!(normalize_title(&long, 255).chars().count(), 255);
        assert_eq!(truncate_title("abcdef", 3), "abc");
    }

    #[test]
    fn test_normalize_record_respects_policy() {
        let record = VideoRecord {
            id: "V1".to_string(),
            title: "It's here".to_string(),
            duration: "PT10M".to_string(),
            view_count: None,
            published_at: "2024-01-02T03:04:05Z".to_string(),
        };

        let plain = normalize_record(&record, &TitlePolicy::default()).unwrap();
        assert_eq!(plain.title, "It's here");
        assert_eq!(plain.duration.total_seconds(), 600);
        assert_eq!(plain.view_count, 0);

        let escaped = normalize_record(
            &record,
            &TitlePolicy {
                max_length: 255,
                escape_quotes: true,
            },
        )
        .unwrap();
        assert_eq!(escaped.title, "It''s here");
    }

    #[test]
    fn test_normalize_record_bad_date() {
        let record = VideoRecord {
            id: "V2".to_string(),
            title: "x".to_string(),
            duration: "PT1S".to_string(),
            view_count: Some("1".to_string()),
            published_at: "2024-13-01T00:00:00Z".to_string(),
        };
        let err = normalize_record(&record, &TitlePolicy::default()).unwrap_err();
        assert_eq!(err.raw, "2024-13-01T00:00:00Z");
    }
}
