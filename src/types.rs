/// Notice types shared by the API, cache and view layers

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Platform a notice targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Mobile,
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Mobile => "MOBILE",
            Platform::Web => "WEB",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Mobile
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MOBILE" => Ok(Platform::Mobile),
            "WEB" => Ok(Platform::Web),
            other => Err(format!("unknown platform '{}' (expected MOBILE or WEB)", other)),
        }
    }
}

/// List filter: a concrete platform or no filtering at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlatformFilter {
    All,
    Mobile,
    Web,
}

impl PlatformFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformFilter::All => "ALL",
            PlatformFilter::Mobile => "MOBILE",
            PlatformFilter::Web => "WEB",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlatformFilter::All => "All platforms",
            PlatformFilter::Mobile => "Mobile",
            PlatformFilter::Web => "Web",
        }
    }
}

impl Default for PlatformFilter {
    fn default() -> Self {
        PlatformFilter::All
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PlatformFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(PlatformFilter::All),
            "MOBILE" => Ok(PlatformFilter::Mobile),
            "WEB" => Ok(PlatformFilter::Web),
            other => Err(format!("unknown platform filter '{}' (expected ALL, MOBILE or WEB)", other)),
        }
    }
}

/// A single announcement record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: i64,
    pub platform: Platform,
    pub version: String,
    pub title: String,
    pub content: String,
    pub view_count: u64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: NaiveDateTime,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub modified_at: NaiveDateTime,
}

/// Audit timestamps arrive either as local date-times or as RFC 3339 with an
/// offset; offset values keep the wall-clock time the server sent.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        raw.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
    }
}

impl Notice {
    /// The mutable part of the notice, as it would be sent back on update
    pub fn fields(&self) -> NoticeFields {
        NoticeFields {
            platform: self.platform,
            version: self.version.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Body of both create and update requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeFields {
    pub platform: Platform,
    pub version: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortInfo {
    pub empty: bool,
    pub sorted: bool,
    pub unsorted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub offset: u64,
    #[serde(default)]
    pub sort: SortInfo,
    pub page_number: u32,
    pub page_size: u32,
    pub paged: bool,
    pub unpaged: bool,
}

/// Server-computed page of notices (Spring `Page` shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticePage {
    pub content: Vec<Notice>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub size: u32,
    /// Zero-based page index
    pub number: u32,
    pub number_of_elements: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
    #[serde(default)]
    pub sort: Option<SortInfo>,
    #[serde(default)]
    pub pageable: Option<Pageable>,
}

/// Parameters of a list query; every distinct combination is its own cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoticeListParams {
    pub platform: PlatformFilter,
    pub page: u32,
    pub size: u32,
}

impl NoticeListParams {
    pub fn new(platform: PlatformFilter, page: u32, size: u32) -> Self {
        Self { platform, page, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notice_decodes_backend_shape() {
        let notice: Notice = serde_json::from_value(json!({
            "id": 7,
            "platform": "WEB",
            "version": "2.1.0",
            "title": "Maintenance",
            "content": "Down at 2am",
            "viewCount": 12,
            "createdAt": "2024-05-01T09:30:00",
            "modifiedAt": "2024-05-02T10:00:00.123456"
        }))
        .unwrap();

        assert_eq!(notice.platform, Platform::Web);
        assert_eq!(notice.view_count, 12);
        assert_eq!(notice.fields().title, "Maintenance");
    }

    #[test]
    fn test_timestamps_with_offsets_decode() {
        let page: NoticePage = serde_json::from_value(json!({
            "content": [
                {
                    "id": 1, "platform": "MOBILE", "version": "1.0.0", "title": "a", "content": "b",
                    "viewCount": 0,
                    "createdAt": "2024-05-01T09:30:00Z",
                    "modifiedAt": "2024-05-01T18:30:00+09:00"
                },
                {
                    "id": 2, "platform": "WEB", "version": "1.0.0", "title": "c", "content": "d",
                    "viewCount": 0,
                    "createdAt": "2024-05-01T09:30:00.5",
                    "modifiedAt": "2024-05-01 09:30:00"
                }
            ],
            "totalPages": 1, "totalElements": 2, "size": 10, "number": 0,
            "numberOfElements": 2, "first": true, "last": true, "empty": false
        }))
        .unwrap();

        let expected = NaiveDateTime::parse_from_str("2024-05-01 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(page.content[0].created_at, expected);
        assert_eq!(page.content[0].modified_at.format("%H:%M").to_string(), "18:30");
        assert_eq!(page.content[1].modified_at, expected);
        assert_eq!(page.content[1].created_at.format("%H:%M:%S%.3f").to_string(), "09:30:00.500");
    }

    #[test]
    fn test_garbage_timestamp_is_a_decode_error() {
        assert!(timestamp::parse("yesterday").is_none());
        assert!(timestamp::parse("2024-05-01T09:30:00+09:00").is_some());
    }

    #[test]
    fn test_fields_serialize_uppercase_platform() {
        let fields = NoticeFields {
            platform: Platform::Mobile,
            version: "1.0".into(),
            title: "t".into(),
            content: "c".into(),
        };
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["platform"], "MOBILE");
    }

    #[test]
    fn test_filter_parsing_is_case_insensitive() {
        assert_eq!("all".parse::<PlatformFilter>().unwrap(), PlatformFilter::All);
        assert_eq!("Web".parse::<Platform>().unwrap(), Platform::Web);
        assert!("desktop".parse::<PlatformFilter>().is_err());
    }
}
