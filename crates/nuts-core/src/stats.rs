use chrono::{DateTime, NaiveTime, Utc};

use nuts_types::{InteractionRecord, UserStats};

use crate::PEANUT;

/// Midnight UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Peanuts received today beyond the ceiling.
#[inline]
pub fn failed_attempts(daily_received: u32, ceiling: u32) -> u32 {
    daily_received.saturating_sub(ceiling)
}

/// Derive a subject's stats from one record batch.
///
/// Single pass; every predicate is pure, so record order does not matter.
/// `last_updated` is set to `now`.
pub fn compute_stats(
    records: &[InteractionRecord],
    subject_id: u64,
    ceiling: u32,
    now: DateTime<Utc>,
) -> UserStats {
    let day_start = start_of_day(now);

    let mut sent = 0u32;
    let mut received = 0u32;
    let mut daily_received = 0u32;

    for record in records.iter().filter(|r| r.contains_marker(PEANUT)) {
        if record.author_id == subject_id {
            sent += 1;
        }
        if record.parent_author_id == Some(subject_id) {
            received += 1;
            if record.timestamp >= day_start {
                daily_received += 1;
            }
        }
    }

    UserStats {
        sent,
        received,
        daily_received,
        failed_attempts: failed_attempts(daily_received, ceiling),
        last_updated: now,
    }
}
