use std::future::Future;
use std::sync::Arc;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use nuts_core::PEANUT;
use nuts_types::InteractionRecord;
use nuts_types::api::CastSearchResponse;

use crate::config::SearchConfig;
use crate::error::{Error, Result};

const SEARCH_PATH: &str = "/v2/farcaster/cast/search";

/// Supplies record batches to the view layer.
/// `SearchClient` is the real implementation; tests substitute their own.
pub trait RecordSource: Send + Sync {
    fn stats_records(&self) -> impl Future<Output = Result<Vec<InteractionRecord>>> + Send;

    fn leaderboard_records(&self) -> impl Future<Output = Result<Vec<InteractionRecord>>> + Send;
}

/// Cast search client. Cheap to clone.
#[derive(Clone)]
pub struct SearchClient {
    http: Client,
    config: Arc<SearchConfig>,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Peanut casts in the channel since `stats_after`, priority mode on.
    pub async fn fetch_stats_records(&self) -> Result<Vec<InteractionRecord>> {
        let mut query = vec![
            ("q", PEANUT.to_string()),
            ("channel_id", self.config.channel_id.clone()),
            ("priority_mode", "true".to_string()),
        ];
        if let Some(after) = self.config.stats_after {
            query.push(("after", after.format("%Y-%m-%d").to_string()));
        }
        self.search(&query).await
    }

    /// The most recent `leaderboard_limit` peanut casts in the channel.
    pub async fn fetch_leaderboard_records(&self) -> Result<Vec<InteractionRecord>> {
        let query = [
            ("q", PEANUT.to_string()),
            ("channel_id", self.config.channel_id.clone()),
            ("limit", self.config.leaderboard_limit.to_string()),
        ];
        self.search(&query).await
    }

    async fn search(&self, query: &[(&str, String)]) -> Result<Vec<InteractionRecord>> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), SEARCH_PATH);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .header("api-key", &self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .inspect_err(|e| warn!("Reading cast search error body failed: {}", e))
                .unwrap_or_default();
            warn!("Cast search failed ({}): {}", status, body);
            return Err(Error::Status { status, body });
        }

        let body = resp.bytes().await?;
        let parsed: CastSearchResponse = serde_json::from_slice(&body).inspect_err(|e| {
            warn!("Cast search returned an undecodable body: {}", e);
        })?;

        debug!(
            "Cast search returned {} casts (more pages: {})",
            parsed.result.casts.len(),
            parsed
                .result
                .next
                .as_ref()
                .and_then(|n| n.cursor.as_ref())
                .is_some()
        );

        Ok(parsed
            .result
            .casts
            .into_iter()
            .map(InteractionRecord::from)
            .collect())
    }
}

impl RecordSource for SearchClient {
    fn stats_records(&self) -> impl Future<Output = Result<Vec<InteractionRecord>>> + Send {
        self.fetch_stats_records()
    }

    fn leaderboard_records(&self) -> impl Future<Output = Result<Vec<InteractionRecord>>> + Send {
        self.fetch_leaderboard_records()
    }
}
