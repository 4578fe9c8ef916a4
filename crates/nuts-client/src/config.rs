use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

pub const DEFAULT_BASE_URL: &str = "https://api.neynar.com";
pub const DEFAULT_CHANNEL_ID: &str = "nuts";
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Search API settings, built once at startup and handed to `SearchClient::new`.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub api_key: String,
    pub channel_id: String,
    /// Lower bound for the stats query. `None` searches the whole channel.
    pub stats_after: Option<NaiveDate>,
    pub leaderboard_limit: u32,
    pub timeout: Duration,
}

impl SearchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            stats_after: NaiveDate::from_ymd_opt(2025, 2, 1),
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `NUTS_*` variables from the process environment.
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("NUTS_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            bail!("NUTS_API_KEY is unset; the search API requires a key");
        }

        let mut config = Self::new(api_key);

        if let Some(url) = lookup("NUTS_SEARCH_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(channel) = lookup("NUTS_CHANNEL_ID") {
            config.channel_id = channel;
        }
        if let Some(after) = lookup("NUTS_STATS_AFTER") {
            config.stats_after = if after.is_empty() {
                None
            } else {
                Some(
                    NaiveDate::parse_from_str(&after, "%Y-%m-%d")
                        .with_context(|| format!("NUTS_STATS_AFTER='{}' is not YYYY-MM-DD", after))?,
                )
            };
        }
        if let Some(limit) = lookup("NUTS_LEADERBOARD_LIMIT") {
            config.leaderboard_limit = limit
                .parse()
                .with_context(|| format!("NUTS_LEADERBOARD_LIMIT='{}' is not a number", limit))?;
        }
        if let Some(secs) = lookup("NUTS_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("NUTS_HTTP_TIMEOUT_SECS='{}' is not a number", secs))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
