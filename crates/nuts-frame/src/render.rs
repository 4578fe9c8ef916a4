use std::fmt::Write;

use chrono::{DateTime, Utc};

use nuts_core::{PEANUT, format_countdown, time_until_reset};
use nuts_types::View;
use nuts_types::events::SafeAreaInsets;

use crate::controller::ViewState;
use crate::session::SessionState;

pub const TITLE: &str = "Peanut Stats";

/// Render the frame as plain text.
///
/// Safe-area insets become blank lines (top, bottom) and leading spaces (left).
pub fn render(view: &ViewState, session: &SessionState, now: DateTime<Utc>) -> String {
    let mut body = String::new();

    let _ = writeln!(body, "{} {}", PEANUT, TITLE);
    body.push_str(&tabs(view.current_view));
    body.push('\n');

    if !session.add_frame_result.is_empty() {
        let _ = writeln!(body, "{}", session.add_frame_result);
    }
    if view.is_loading {
        let _ = writeln!(body, "Loading peanut data... {}", PEANUT);
    }
    if let Some(error) = &view.error {
        let _ = writeln!(body, "{}", error);
    }

    // An error stands in for the content; the search box stays for a retry.
    let failed = view.error.is_some();
    match view.current_view {
        View::Stats if !failed => stats_panel(&mut body, view, now),
        View::Leaderboard if !failed => leaderboard_panel(&mut body, view),
        View::Stats | View::Leaderboard => {}
        View::Search => {
            let _ = writeln!(body, "Enter FID to search: {}", view.search_input);
        }
    }

    pad(&body, session.padding())
}

fn tabs(current: View) -> String {
    [
        (View::Stats, "My Stats"),
        (View::Leaderboard, "Leaderboard"),
        (View::Search, "Search FID"),
    ]
    .iter()
    .map(|(view, label)| {
        if *view == current {
            format!("[{}]", label)
        } else {
            format!(" {} ", label)
        }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

fn stats_panel(out: &mut String, view: &ViewState, now: DateTime<Utc>) {
    let Some(stats) = &view.stats else {
        return;
    };

    // Searched fid rather than the viewer.
    if let Some(fid) = view.stats_subject.filter(|fid| Some(*fid) != view.subject) {
        let _ = writeln!(out, "FID: {}", fid);
    }
    let _ = writeln!(out, "Sent Peanuts: {}", stats.sent);
    let _ = writeln!(out, "Received Peanuts: {}", stats.received);
    let _ = writeln!(out, "Today's Peanuts: {}/{}", stats.daily_received, view.ceiling);
    let _ = writeln!(out, "Failed Attempts: {}", stats.failed_attempts);
    let _ = writeln!(
        out,
        "Next allowance reset in {}",
        format_countdown(time_until_reset(now))
    );
}

fn leaderboard_panel(out: &mut String, view: &ViewState) {
    let _ = writeln!(out, "Top Peanut Senders");
    for (rank, entry) in view.leaderboard.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} (FID: {})  {} {}",
            rank + 1,
            entry.author_handle,
            entry.author_id,
            entry.sent_count,
            PEANUT
        );
    }
}

fn pad(body: &str, insets: SafeAreaInsets) -> String {
    let indent = " ".repeat(insets.left as usize);
    let mut out = "\n".repeat(insets.top as usize);
    for line in body.lines() {
        out.push_str(&indent);
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&"\n".repeat(insets.bottom as usize));
    out
}
