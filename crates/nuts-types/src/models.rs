use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cast observed in the channel.
/// Only `text` is inspected, and only for the peanut marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub author_id: u64,
    pub author_handle: String,
    /// Set when the cast is a reply.
    pub parent_author_id: Option<u64>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn contains_marker(&self, marker: &str) -> bool {
        self.text.contains(marker)
    }
}

/// Stats derived for one subject from a single record batch.
/// Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub sent: u32,
    pub received: u32,
    pub daily_received: u32,
    pub failed_attempts: u32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub author_id: u64,
    pub author_handle: String,
    pub sent_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceState {
    pub ceiling: u32,
    pub reset_at: DateTime<Utc>,
}

/// Tabs of the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Stats,
    Leaderboard,
    Search,
}
