use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::allowance::AllowanceClock;

/// How often the background task checks the reset boundary.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(60);

pub type SharedClock = Arc<Mutex<AllowanceClock>>;

/// Background task that re-arms the daily allowance.
///
/// Ticks the clock against the wall clock every `period` and hands the fresh
/// ceiling to `on_reset` whenever the boundary was crossed. Only local state is
/// touched; no I/O happens here.
pub async fn run_reset_loop<F>(clock: SharedClock, period: Duration, mut on_reset: F)
where
    F: FnMut(u32) + Send,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let reset = {
            let mut clock = clock.lock();
            clock.tick(Utc::now()).then(|| clock.ceiling())
        };

        match reset {
            Some(ceiling) => on_reset(ceiling),
            None => debug!("Allowance check: no reset due"),
        }
    }
}
