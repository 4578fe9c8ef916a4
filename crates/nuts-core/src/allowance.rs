use chrono::{DateTime, TimeDelta, Utc};
use tracing::info;

use nuts_types::AllowanceState;

use crate::stats::start_of_day;

/// Peanuts a user may receive per day before extra ones count as failed.
pub const DEFAULT_CEILING: u32 = 30;

/// Hour of day (UTC) at which the allowance re-arms.
pub const RESET_HOUR: i64 = 11;

/// Next 11:00 UTC strictly after `now`.
pub fn next_reset_instant(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = start_of_day(now) + TimeDelta::hours(RESET_HOUR);
    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

/// Time left until the next reset. Always positive.
pub fn time_until_reset(now: DateTime<Utc>) -> TimeDelta {
    next_reset_instant(now) - now
}

/// Renders a countdown as `"{h}h {m}m"`, truncating seconds.
pub fn format_countdown(remaining: TimeDelta) -> String {
    let secs = remaining.num_seconds().max(0);
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

/// Daily ceiling plus the instant it next re-arms.
#[derive(Debug, Clone)]
pub struct AllowanceClock {
    default_ceiling: u32,
    state: AllowanceState,
}

impl AllowanceClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_ceiling(DEFAULT_CEILING, now)
    }

    pub fn with_ceiling(ceiling: u32, now: DateTime<Utc>) -> Self {
        Self {
            default_ceiling: ceiling,
            state: AllowanceState {
                ceiling,
                reset_at: next_reset_instant(now),
            },
        }
    }

    #[inline]
    pub fn ceiling(&self) -> u32 {
        self.state.ceiling
    }

    #[inline]
    pub fn reset_at(&self) -> DateTime<Utc> {
        self.state.reset_at
    }

    #[inline]
    pub fn state(&self) -> AllowanceState {
        self.state
    }

    /// Overrides the ceiling until the next reset.
    pub fn set_ceiling(&mut self, ceiling: u32) {
        self.state.ceiling = ceiling;
    }

    pub fn time_until_reset(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.state.reset_at - now).max(TimeDelta::zero())
    }

    /// Apply the reset if `now` has crossed the boundary.
    ///
    /// Compares instants rather than minute-of-day, so a tick that lands late
    /// (suspended process, coarse interval) still resets on its next run.
    /// Returns true if a reset happened.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if now < self.state.reset_at {
            return false;
        }

        self.state.ceiling = self.default_ceiling;
        self.state.reset_at = next_reset_instant(now);
        info!(
            "Allowance reset: ceiling={} next_reset={}",
            self.state.ceiling, self.state.reset_at
        );
        true
    }
}
