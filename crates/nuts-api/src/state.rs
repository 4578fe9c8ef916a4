use std::sync::Arc;

use chrono::{DateTime, Utc};

use nuts_client::SearchClient;
use nuts_core::{AllowanceClock, SharedClock};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub client: SearchClient,
    /// Shared with the reset loop spawned by the server.
    pub clock: SharedClock,
}

impl AppStateInner {
    pub fn new(client: SearchClient, now: DateTime<Utc>) -> Self {
        Self {
            client,
            clock: Arc::new(parking_lot::Mutex::new(AllowanceClock::new(now))),
        }
    }

    pub fn ceiling(&self) -> u32 {
        self.clock.lock().ceiling()
    }
}
