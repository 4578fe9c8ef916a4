pub mod config;
pub mod error;
pub mod search;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use search::{RecordSource, SearchClient};
