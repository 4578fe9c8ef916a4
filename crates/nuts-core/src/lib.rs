/// Peanut Stats core: pure computations over channel casts.
///
/// - Allowance clock: daily ceiling that re-arms at 11:00 UTC
/// - Stats aggregation: sent / received / received today / failed attempts
/// - Leaderboard: authors ranked by peanuts sent
/// - Reset loop: the once-a-minute background allowance check

pub mod allowance;
pub mod leaderboard;
pub mod schedule;
pub mod stats;

/// Marker that turns a cast into a peanut.
pub const PEANUT: &str = "🥜";

pub use allowance::{
    AllowanceClock, DEFAULT_CEILING, RESET_HOUR, format_countdown, next_reset_instant,
    time_until_reset,
};
pub use leaderboard::build_leaderboard;
pub use schedule::{CHECK_INTERVAL, SharedClock, run_reset_loop};
pub use stats::{compute_stats, failed_attempts, start_of_day};
