use reqwest::StatusCode;

/// Failures talking to the cast search API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure: DNS, connect, timeout, truncated body
    #[error("search request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("search api returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Body did not decode into the expected cast shape
    #[error("malformed search response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Error {
    /// True for transport and status failures, false for decode failures.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
