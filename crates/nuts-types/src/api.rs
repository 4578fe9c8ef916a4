use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::InteractionRecord;

// -- Upstream cast search --

#[derive(Debug, Deserialize)]
pub struct CastSearchResponse {
    pub result: CastSearchResult,
}

#[derive(Debug, Deserialize)]
pub struct CastSearchResult {
    pub casts: Vec<Cast>,
    /// Pagination cursor. Only the first page is ever requested.
    #[serde(default)]
    pub next: Option<NextCursor>,
}

#[derive(Debug, Deserialize)]
pub struct NextCursor {
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Cast {
    #[serde(default)]
    pub hash: String,
    pub author: CastAuthor,
    #[serde(default)]
    pub parent_author: Option<ParentAuthor>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CastAuthor {
    pub fid: u64,
    #[serde(default)]
    pub username: String,
}

/// Top-level casts come back as `{"fid": null}` rather than a missing object.
#[derive(Debug, Deserialize)]
pub struct ParentAuthor {
    pub fid: Option<u64>,
}

impl From<Cast> for InteractionRecord {
    fn from(cast: Cast) -> Self {
        Self {
            author_id: cast.author.fid,
            author_handle: cast.author.username,
            parent_author_id: cast.parent_author.and_then(|p| p.fid),
            text: cast.text,
            timestamp: cast.timestamp,
        }
    }
}

// -- Frame backend --

#[derive(Debug, Serialize, Deserialize)]
pub struct AllowanceResponse {
    pub ceiling: u32,
    pub reset_at: DateTime<Utc>,
    pub seconds_until_reset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_parent_fid_is_not_a_reply() {
        let body = r#"{
            "result": {
                "casts": [
                    {
                        "hash": "0xabc",
                        "author": { "fid": 7, "username": "alice", "display_name": "Alice" },
                        "parent_author": { "fid": null },
                        "text": "gm 🥜",
                        "timestamp": "2025-02-03T10:00:00.000Z"
                    },
                    {
                        "hash": "0xdef",
                        "author": { "fid": 8, "username": "bob" },
                        "parent_author": { "fid": 7 },
                        "text": "🥜🥜",
                        "timestamp": "2025-02-03T11:30:00Z"
                    }
                ],
                "next": { "cursor": null }
            }
        }"#;

        let resp: CastSearchResponse = serde_json::from_str(body).unwrap();
        let records: Vec<InteractionRecord> =
            resp.result.casts.into_iter().map(Into::into).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author_handle, "alice");
        assert_eq!(records[0].parent_author_id, None);
        assert_eq!(records[1].parent_author_id, Some(7));
        assert!(records[1].contains_marker("🥜"));
    }

    #[test]
    fn missing_parent_author_is_tolerated() {
        let body = r#"{"result":{"casts":[
            {"author":{"fid":1,"username":"x"},"text":"hi","timestamp":"2025-02-01T00:00:00Z"}
        ]}}"#;

        let resp: CastSearchResponse = serde_json::from_str(body).unwrap();
        assert!(resp.result.next.is_none());
        let record = InteractionRecord::from(resp.result.casts.into_iter().next().unwrap());
        assert_eq!(record.parent_author_id, None);
        assert!(!record.contains_marker("🥜"));
    }
}
