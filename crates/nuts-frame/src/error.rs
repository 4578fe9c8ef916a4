/// Shown when the stats fetch fails, whatever the cause.
pub const STATS_FAILED: &str = "Failed to load peanut stats. Please try again.";

/// Shown when the leaderboard fetch fails, whatever the cause.
pub const LEADERBOARD_FAILED: &str = "Failed to load leaderboard. Please try again.";

/// Shown when the search box does not hold a fid.
pub const INVALID_FID: &str = "Enter a numeric FID.";

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Search(#[from] nuts_client::Error),

    #[error("'{0}' is not a numeric FID")]
    InvalidInput(String),
}

/// Parse the search box contents as a fid.
pub fn parse_fid(input: &str) -> Result<u64, ViewError> {
    let trimmed = input.trim();
    trimmed
        .parse()
        .map_err(|_| ViewError::InvalidInput(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_fids() {
        assert_eq!(parse_fid("3621").unwrap(), 3621);
        assert_eq!(parse_fid("  42\n").unwrap(), 42);
    }

    #[test]
    fn rejects_non_numeric_input() {
        for input in ["", "abc", "-1", "12.5", "1e3", "NaN"] {
            match parse_fid(input) {
                Err(ViewError::InvalidInput(raw)) => assert_eq!(raw, input.trim()),
                other => panic!("{:?} should be rejected, got {:?}", input, other),
            }
        }
    }
}
