use std::collections::HashMap;

use nuts_types::{InteractionRecord, LeaderboardEntry};

use crate::PEANUT;

/// Rank authors by peanuts sent, most first.
///
/// Only casts carrying the marker are counted. The handle is the first one seen
/// for an author. Ties keep first-seen order (stable sort).
pub fn build_leaderboard(records: &[InteractionRecord]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.contains_marker(PEANUT)) {
        let slot = *index.entry(record.author_id).or_insert_with(|| {
            entries.push(LeaderboardEntry {
                author_id: record.author_id,
                author_handle: record.author_handle.clone(),
                sent_count: 0,
            });
            entries.len() - 1
        });
        entries[slot].sent_count += 1;
    }

    entries.sort_by(|a, b| b.sent_count.cmp(&a.sent_count));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn cast(author: u64, handle: &str, text: &str) -> InteractionRecord {
        InteractionRecord {
            author_id: author,
            author_handle: handle.to_string(),
            parent_author_id: None,
            text: text.to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 2, 3, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_ranks_by_sent_desc() {
        let mut records = Vec::new();
        for _ in 0..3 {
            records.push(cast(2, "bob", "🥜"));
        }
        for _ in 0..5 {
            records.push(cast(1, "alice", "🥜"));
        }

        let board = build_leaderboard(&records);
        let ranked: Vec<(&str, u32)> = board
            .iter()
            .map(|e| (e.author_handle.as_str(), e.sent_count))
            .collect();
        assert_eq!(ranked, vec![("alice", 5), ("bob", 3)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![
            cast(3, "carol", "🥜"),
            cast(1, "alice", "🥜"),
            cast(2, "bob", "🥜"),
            cast(2, "bob", "🥜"),
            cast(1, "alice", "🥜"),
            cast(3, "carol", "🥜"),
        ];

        let ids: Vec<u64> = build_leaderboard(&records).iter().map(|e| e.author_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(build_leaderboard(&records), build_leaderboard(&records));
    }

    #[test]
    fn test_first_seen_handle_wins() {
        let records = vec![cast(9, "old", "🥜"), cast(9, "renamed", "🥜")];
        let board = build_leaderboard(&records);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].author_handle, "old");
        assert_eq!(board[0].sent_count, 2);
    }

    #[test]
    fn test_ignores_casts_without_marker() {
        let records = vec![cast(1, "alice", "gm"), cast(2, "bob", "🥜"), cast(1, "alice", "gn")];
        let board = build_leaderboard(&records);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].author_id, 2);
    }

    #[test]
    fn test_order_is_non_increasing() {
        let records: Vec<_> = (0..40u64)
            .map(|i| cast(i % 7, "u", if i % 5 == 0 { "x" } else { "🥜" }))
            .collect();

        let board = build_leaderboard(&records);
        for pair in board.windows(2) {
            assert!(pair[0].sent_count >= pair[1].sent_count);
        }
        let total: u32 = board.iter().map(|e| e.sent_count).sum();
        assert_eq!(total, 32);
    }
}
