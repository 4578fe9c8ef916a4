/// HTTP surface of the Peanut Stats backend.
///
/// Stats and leaderboard are computed on request from a fresh cast search;
/// nothing is stored between requests. The allowance clock is the only
/// shared state.

pub mod allowance;
pub mod state;
pub mod stats;

use axum::{Router, routing::get};

pub use state::{AppState, AppStateInner};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats/{fid}", get(stats::get_stats))
        .route("/leaderboard", get(stats::get_leaderboard))
        .route("/allowance", get(allowance::get_allowance))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use httpmock::prelude::*;
    use tower::ServiceExt;

    use nuts_client::{SearchClient, SearchConfig};
    use nuts_types::api::AllowanceResponse;
    use nuts_types::{LeaderboardEntry, UserStats};

    const CASTS: &str = r#"{
        "result": {
            "casts": [
                {
                    "author": { "fid": 100, "username": "alice" },
                    "parent_author": { "fid": 200 },
                    "text": "🥜",
                    "timestamp": "2025-02-03T12:00:00Z"
                },
                {
                    "author": { "fid": 100, "username": "alice" },
                    "parent_author": { "fid": 300 },
                    "text": "🥜🥜",
                    "timestamp": "2025-02-03T12:05:00Z"
                },
                {
                    "author": { "fid": 200, "username": "bob" },
                    "parent_author": { "fid": 100 },
                    "text": "thanks 🥜",
                    "timestamp": "2025-02-03T13:00:00Z"
                }
            ]
        }
    }"#;

    fn app(server: &MockServer) -> Router {
        let mut config = SearchConfig::new("test-key");
        config.base_url = server.base_url();
        let client = SearchClient::new(config).unwrap();
        router(Arc::new(AppStateInner::new(client, Utc::now())))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start_async().await;
        let (status, body) = get(app(&server), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_stats_for_fid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).query_param("priority_mode", "true");
                then.status(200).body(CASTS);
            })
            .await;

        let (status, body) = get(app(&server), "/stats/100").await;
        assert_eq!(status, StatusCode::OK);

        let stats: UserStats = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.received, 1);
        assert_eq!(stats.daily_received, 0);
        assert_eq!(stats.failed_attempts, 0);
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_senders() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).query_param("limit", "20");
                then.status(200).body(CASTS);
            })
            .await;

        let (status, body) = get(app(&server), "/leaderboard").await;
        assert_eq!(status, StatusCode::OK);

        let board: Vec<LeaderboardEntry> = serde_json::from_slice(&body).unwrap();
        let ranked: Vec<(&str, u32)> = board
            .iter()
            .map(|e| (e.author_handle.as_str(), e.sent_count))
            .collect();
        assert_eq!(ranked, vec![("alice", 2), ("bob", 1)]);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(500).body("boom");
            })
            .await;

        let (status, _) = get(app(&server), "/stats/100").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = get(app(&server), "/leaderboard").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_undecodable_upstream_is_bad_gateway() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).body("{\"result\":");
            })
            .await;

        let (status, _) = get(app(&server), "/stats/100").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_non_numeric_fid_is_rejected() {
        let server = MockServer::start_async().await;
        let (status, _) = get(app(&server), "/stats/alice").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_allowance_reports_ceiling_and_countdown() {
        let server = MockServer::start_async().await;
        let (status, body) = get(app(&server), "/allowance").await;
        assert_eq!(status, StatusCode::OK);

        let allowance: AllowanceResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(allowance.ceiling, 30);
        assert!(allowance.reset_at > Utc::now());
        assert!(allowance.seconds_until_reset > 0);
        assert!(allowance.seconds_until_reset <= 24 * 3600);
    }
}
