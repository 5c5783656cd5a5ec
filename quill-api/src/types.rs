//! Wire types for the remote post API
//!
//! Field names follow the backend's camelCase JSON. Timestamps arrive as
//! formatted datetime strings; `PostVo::update_time_millis` converts the
//! last-modified time to epoch milliseconds for draft comparison.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint; `code == 0` is success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Whether the envelope signals success
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Server view of a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostVo {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl PostVo {
    /// Last-modified time as epoch milliseconds, if the server sent one in
    /// a recognized format. Unparseable values count as no baseline.
    pub fn update_time_millis(&self) -> Option<i64> {
        let raw = self.update_time.as_deref()?;
        parse_datetime_millis(raw)
    }
}

/// Parse a backend datetime string to epoch milliseconds.
///
/// Accepts RFC 3339 and the backend's plain `YYYY-MM-DD HH:MM:SS` forms;
/// naive values are taken as UTC.
pub fn parse_datetime_millis(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    None
}

/// Payload for creating a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAddRequest {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Payload for updating an existing post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdateRequest {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let resp: ApiResponse<i64> = serde_json::from_str(r#"{"code": 0, "data": 42}"#).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.data, Some(42));
        assert!(resp.message.is_none());
    }

    #[test]
    fn test_envelope_error_carries_message() {
        let resp: ApiResponse<PostVo> =
            serde_json::from_str(r#"{"code": 40100, "message": "not logged in"}"#).unwrap();
        assert!(!resp.is_success());
        assert!(resp.data.is_none());
        assert_eq!(resp.message.as_deref(), Some("not logged in"));
    }

    #[test]
    fn test_post_vo_decodes_camel_case() {
        let json = r##"{
            "id": 7,
            "title": "Hello",
            "content": "# Hello",
            "tagList": ["rust", "blog"],
            "updateTime": "2024-05-01 10:30:00",
            "coverImage": "http://img.test/c.png"
        }"##;
        let post: PostVo = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.tag_list, vec!["rust", "blog"]);
        assert_eq!(post.cover_image.as_deref(), Some("http://img.test/c.png"));
        assert!(post.update_time_millis().is_some());
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime_millis("2024-05-01 10:30:00").is_some());
        assert!(parse_datetime_millis("2024-05-01T10:30:00").is_some());
        assert!(parse_datetime_millis("2024-05-01T10:30:00+08:00").is_some());
        assert!(parse_datetime_millis("yesterday").is_none());
    }

    #[test]
    fn test_add_request_omits_empty_settings() {
        let req = PostAddRequest {
            title: "T".to_string(),
            content: "c".to_string(),
            tags: vec![],
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("categoryId"));
        assert!(!json.contains("summary"));
    }
}
