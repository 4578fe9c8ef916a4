use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use nuts_client::RecordSource;
use nuts_core::{DEFAULT_CEILING, build_leaderboard, compute_stats};
use nuts_types::{LeaderboardEntry, UserStats, View};

use crate::error::{INVALID_FID, LEADERBOARD_FAILED, STATS_FAILED, ViewError, parse_fid};

/// Everything the frame needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub current_view: View,
    pub is_loading: bool,
    pub error: Option<String>,
    pub search_input: String,
    /// The viewer's fid, once the host supplied it.
    pub subject: Option<u64>,
    pub stats: Option<UserStats>,
    /// Whose stats `stats` holds; differs from `subject` after a search.
    pub stats_subject: Option<u64>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub ceiling: u32,
}

impl ViewState {
    fn new(ceiling: u32) -> Self {
        Self {
            current_view: View::Stats,
            is_loading: false,
            error: None,
            search_input: String::new(),
            subject: None,
            stats: None,
            stats_subject: None,
            leaderboard: Vec::new(),
            ceiling,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.stats.is_some() || !self.leaderboard.is_empty() {
            Phase::Displaying
        } else {
            Phase::Idle
        }
    }
}

/// idle -> loading -> {displaying, error}, back to loading on every trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Displaying,
    Error,
}

/// What happened to a triggered fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result (or its error) is now on display.
    Applied,
    /// A later trigger or a teardown took over; the result was dropped.
    Superseded,
    /// Nothing needed fetching.
    Skipped,
}

struct Shared {
    view: ViewState,
    /// Sequence number of the most recently issued fetch.
    latest: u64,
    in_flight: Option<CancellationToken>,
}

struct Ticket {
    seq: u64,
    token: CancellationToken,
}

/// Holds the frame's display state and runs fetches against a `RecordSource`.
///
/// Every trigger gets a new sequence number and cancels whatever was in flight,
/// so the last-issued fetch always wins. State is only touched in short
/// critical sections, never across an await. Cheap to clone.
pub struct ViewController<S> {
    source: Arc<S>,
    shared: Arc<Mutex<Shared>>,
    changes: Arc<watch::Sender<u64>>,
}

impl<S> Clone for ViewController<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            shared: self.shared.clone(),
            changes: self.changes.clone(),
        }
    }
}

impl<S: RecordSource> ViewController<S> {
    pub fn new(source: S) -> Self {
        Self::with_ceiling(source, DEFAULT_CEILING)
    }

    pub fn with_ceiling(source: S, ceiling: u32) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            source: Arc::new(source),
            shared: Arc::new(Mutex::new(Shared {
                view: ViewState::new(ceiling),
                latest: 0,
                in_flight: None,
            })),
            changes: Arc::new(changes),
        }
    }

    pub fn snapshot(&self) -> ViewState {
        self.shared.lock().view.clone()
    }

    /// Bumps whenever the display state changes.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Ceiling used for the next failed-attempts derivation.
    pub fn set_ceiling(&self, ceiling: u32) {
        self.update(|view| view.ceiling = ceiling);
    }

    pub fn set_search_input(&self, input: impl Into<String>) {
        let input = input.into();
        self.update(|view| view.search_input = input);
    }

    /// Record the viewer's fid and load their stats when it first appears or changes.
    pub async fn set_subject(&self, fid: Option<u64>) -> Result<Completion, ViewError> {
        let changed = {
            let mut shared = self.shared.lock();
            let changed = shared.view.subject != fid;
            shared.view.subject = fid;
            changed
        };

        match fid {
            Some(fid) if changed => {
                info!("Viewer fid {} available, loading stats", fid);
                self.load_stats(fid).await
            }
            _ => Ok(Completion::Skipped),
        }
    }

    /// Switch tabs. The leaderboard is refetched on every visit; stats only
    /// when none are on display yet.
    pub async fn select_view(&self, view: View) -> Result<Completion, ViewError> {
        let stats_for = {
            let mut shared = self.shared.lock();
            shared.view.current_view = view;
            match view {
                View::Stats if shared.view.stats.is_none() => shared.view.subject,
                _ => None,
            }
        };
        self.notify();

        match (view, stats_for) {
            (View::Leaderboard, _) => self.load_leaderboard().await,
            (View::Stats, Some(fid)) => self.load_stats(fid).await,
            _ => Ok(Completion::Skipped),
        }
    }

    /// Look up the fid typed into the search box and show its stats.
    pub async fn submit_search(&self) -> Result<Completion, ViewError> {
        let input = self.shared.lock().view.search_input.clone();

        let fid = match parse_fid(&input) {
            Ok(fid) => fid,
            Err(e) => {
                debug!("Rejected search input: {}", e);
                self.update(|view| view.error = Some(INVALID_FID.to_string()));
                return Err(e);
            }
        };

        self.update(|view| view.current_view = View::Stats);
        self.load_stats(fid).await
    }

    /// Fetch the channel's casts and derive `fid`'s stats.
    pub async fn load_stats(&self, fid: u64) -> Result<Completion, ViewError> {
        let ticket = self.begin();

        let result = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => return Ok(Completion::Superseded),
            result = self.source.stats_records() => result,
        };

        let now = Utc::now();
        self.finish(ticket.seq, move |view| match result {
            Ok(records) => {
                let stats = compute_stats(&records, fid, view.ceiling, now);
                debug!(
                    "Stats for fid {}: sent={} received={} today={} failed={}",
                    fid, stats.sent, stats.received, stats.daily_received, stats.failed_attempts
                );
                view.stats = Some(stats);
                view.stats_subject = Some(fid);
                Ok(())
            }
            Err(e) => {
                warn!("Loading stats for fid {} failed: {}", fid, e);
                view.error = Some(STATS_FAILED.to_string());
                Err(e.into())
            }
        })
    }

    /// Fetch recent casts and rank their authors.
    pub async fn load_leaderboard(&self) -> Result<Completion, ViewError> {
        let ticket = self.begin();

        let result = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => return Ok(Completion::Superseded),
            result = self.source.leaderboard_records() => result,
        };

        self.finish(ticket.seq, move |view| match result {
            Ok(records) => {
                view.leaderboard = build_leaderboard(&records);
                debug!("Leaderboard rebuilt with {} senders", view.leaderboard.len());
                Ok(())
            }
            Err(e) => {
                warn!("Loading leaderboard failed: {}", e);
                view.error = Some(LEADERBOARD_FAILED.to_string());
                Err(e.into())
            }
        })
    }

    /// Abandon any in-flight fetch. Its result, if it still arrives, is dropped.
    pub fn cancel(&self) {
        {
            let mut shared = self.shared.lock();
            shared.latest += 1;
            if let Some(token) = shared.in_flight.take() {
                token.cancel();
            }
            shared.view.is_loading = false;
        }
        self.notify();
    }

    fn begin(&self) -> Ticket {
        let token = CancellationToken::new();
        let seq = {
            let mut shared = self.shared.lock();
            shared.latest += 1;
            if let Some(previous) = shared.in_flight.replace(token.clone()) {
                previous.cancel();
            }
            shared.view.is_loading = true;
            shared.view.error = None;
            shared.latest
        };
        self.notify();
        Ticket { seq, token }
    }

    fn finish<F>(&self, seq: u64, apply: F) -> Result<Completion, ViewError>
    where
        F: FnOnce(&mut ViewState) -> Result<(), ViewError>,
    {
        let result = {
            let mut shared = self.shared.lock();
            if shared.latest != seq {
                debug!("Dropping result of superseded fetch #{}", seq);
                return Ok(Completion::Superseded);
            }
            shared.in_flight = None;
            shared.view.is_loading = false;
            apply(&mut shared.view)
        };
        self.notify();
        result.map(|()| Completion::Applied)
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut ViewState),
    {
        f(&mut self.shared.lock().view);
        self.notify();
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}
