use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;

use nuts_types::api::AllowanceResponse;

use crate::state::AppState;

/// Current ceiling and when it next re-arms.
pub async fn get_allowance(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let response = {
        let clock = state.clock.lock();
        AllowanceResponse {
            ceiling: clock.ceiling(),
            reset_at: clock.reset_at(),
            seconds_until_reset: clock.time_until_reset(now).num_seconds(),
        }
    };

    Json(response)
}
