//! Deck-Search: concurrent paginated search over Speaker Deck
//!
//! This crate discovers how many result pages a search has, fetches them
//! concurrently, extracts the talks listed on each page, and merges everything
//! into a single most-recent-first result set.

pub mod config;
pub mod output;
pub mod search;
pub mod state;

use thiserror::Error;

/// Main error type for Deck-Search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No search term provided")]
    EmptySearchTerm,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to discover page count from page {page}: {source}")]
    Discovery { page: u32, source: PageError },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CoordinatorState,
        to: state::CoordinatorState,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Transport failures while retrieving one result page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Failed to read body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),
}

/// The page layout did not match what the extractor expects
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Result list container not found on page {page}")]
    MissingResults { page: u32 },

    #[error("Entry {index} on page {page} has no date field")]
    MissingDate { page: u32, index: usize },
}

/// A single entry whose date text could not be parsed
#[derive(Debug, Error)]
#[error("Unparsable date '{text}': {source}")]
pub struct DateParseError {
    pub text: String,
    pub source: chrono::ParseError,
}

/// Why a single page produced no results
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Page task ended without reporting")]
    TaskAborted,
}

/// Result type alias for Deck-Search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use search::{
    run_search, HttpFetcher, PageExtractor, PageFetcher, PageResult, PaginationCoordinator,
    Record, RunResult, SearchTerm, SpeakerDeckExtractor,
};
pub use state::CoordinatorState;
