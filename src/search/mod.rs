//! Search module: the paginated fetch-extract-merge pipeline
//!
//! This module contains:
//! - Per-page query URL construction
//! - HTTP fetching of result pages
//! - Record and page-count extraction from result markup
//! - The two-phase pagination coordinator
//! - Merging and ordering of page results

mod aggregator;
mod coordinator;
mod extractor;
mod fetcher;
mod query;
mod types;

pub use aggregator::{merge, sort_most_recent_first, ResultAggregator};
pub use coordinator::{clamp_page_count, run_search, PaginationCoordinator};
pub use extractor::{parse_date, PageExtractor, SpeakerDeckExtractor};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use query::page_url;
pub use types::{
    PageFailure, PageNumber, PageOutcome, PageResult, RawDocument, Record, RunResult, SearchTerm,
};
