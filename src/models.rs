use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub type HttpRequest = http::Request<Vec<u8>>;
pub type HttpResponse = http::Response<Vec<u8>>;

/// Metadata attached to every stored log in KV.
///
/// Every field is optional when reading so that records written by older
/// deployments (which stored less) still download.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, alias = "lastModified", skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Request body after normalization by the content extractor.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedContent {
    pub bytes: Vec<u8>,
    pub name: Option<String>,
    pub media_type: Option<String>,
}

/// One stored log file, keyed by its identifier. Never updated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub id: String,
    pub content: Vec<u8>,
    pub name: String,
    pub media_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl LogRecord {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn expires_at(&self, ttl_seconds: u64) -> DateTime<Utc> {
        self.uploaded_at + Duration::seconds(ttl_seconds as i64)
    }

    pub fn metadata(&self) -> LogMetadata {
        LogMetadata {
            name: Some(self.name.clone()),
            media_type: self.media_type.clone(),
            size: Some(self.size()),
            uploaded_at: Some(self.uploaded_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> LogRecord {
        LogRecord {
            id: "4f1c2a9e-8b7d-4e0a-9c3b-2d5e6f7a8b9c".to_string(),
            content: b"hello".to_vec(),
            name: "a.log".to_string(),
            media_type: Some("text/plain; charset=utf-8".to_string()),
            uploaded_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn expiry_is_upload_time_plus_ttl() {
        let expires = record().expires_at(3600);
        assert_eq!(expires, Utc.with_ymd_and_hms(2024, 1, 15, 11, 30, 0).unwrap());
    }

    #[test]
    fn metadata_uses_camel_case_and_type_key() {
        let json = serde_json::to_value(record().metadata()).unwrap();
        assert_eq!(json["name"], "a.log");
        assert_eq!(json["type"], "text/plain; charset=utf-8");
        assert_eq!(json["size"], 5);
        assert!(json.get("uploadedAt").is_some());
    }

    #[test]
    fn legacy_metadata_still_parses() {
        let meta: LogMetadata = serde_json::from_str(
            r#"{"name":"old.txt","lastModified":"2023-05-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(meta.name.as_deref(), Some("old.txt"));
        assert!(meta.media_type.is_none());
        assert!(meta.uploaded_at.is_some());

        let empty: LogMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, LogMetadata::default());
    }
}
