use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{debug, warn};

use nuts_core::{build_leaderboard, compute_stats};

use crate::state::AppState;

/// Peanut stats for one fid, derived from the channel's casts.
pub async fn get_stats(
    State(state): State<AppState>,
    Path(fid): Path<u64>,
) -> Result<impl IntoResponse, StatusCode> {
    let records = state.client.fetch_stats_records().await.map_err(|e| {
        warn!("Stats search for fid {} failed: {}", fid, e);
        StatusCode::BAD_GATEWAY
    })?;

    let stats = compute_stats(&records, fid, state.ceiling(), Utc::now());
    debug!(
        "fid {}: sent={} received={} today={}",
        fid, stats.sent, stats.received, stats.daily_received
    );

    Ok(Json(stats))
}

pub async fn get_leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let records = state.client.fetch_leaderboard_records().await.map_err(|e| {
        warn!("Leaderboard search failed: {}", e);
        StatusCode::BAD_GATEWAY
    })?;

    Ok(Json(build_leaderboard(&records)))
}
