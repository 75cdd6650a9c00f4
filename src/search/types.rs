//! Data model shared by the fetch, extract, coordinate, and merge stages

use crate::{PageError, SearchError};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// 1-based result page index
pub type PageNumber = u32;

/// The caller's search term, immutable for the duration of a run
///
/// Cloning is cheap so each page task can hold its own handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(Arc<str>);

impl SearchTerm {
    /// Creates a search term, rejecting blank input
    pub fn new(term: &str) -> Result<Self, SearchError> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptySearchTerm);
        }
        Ok(Self(Arc::from(trimmed)))
    }

    /// Joins positional arguments with single spaces into one term
    pub fn from_args<I, S>(args: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self::new(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fetched page body along with the URL it came from
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// URL the body was retrieved from
    pub url: String,

    /// Undecoded HTML text
    pub body: String,
}

impl RawDocument {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }
}

/// One talk extracted from a result page
///
/// Fields are private: a record never changes once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    timestamp: NaiveDate,
    rendered: String,
    id: Option<String>,
}

impl Record {
    pub fn new(timestamp: NaiveDate, rendered: impl Into<String>, id: Option<String>) -> Self {
        Self {
            timestamp,
            rendered: rendered.into(),
            id,
        }
    }

    /// Publication date, used only for ordering
    pub fn timestamp(&self) -> NaiveDate {
        self.timestamp
    }

    /// The entry's original markup, verbatim
    pub fn rendered_content(&self) -> &str {
        &self.rendered
    }

    /// The entry's `data-id` attribute, if the page carried one
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Everything extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Which page this came from
    pub page: PageNumber,

    /// Records in the order they appear on the page
    pub records: Vec<Record>,

    /// Total page count read from the pagination control (page 1 only)
    pub total_pages_hint: Option<u32>,

    /// Entries skipped because their date could not be parsed
    pub dropped_records: usize,
}

/// A page that was expected but did not contribute records
#[derive(Debug)]
pub struct PageFailure {
    pub page: PageNumber,
    pub error: PageError,
}

/// What a fanned-out page task reports back to the coordinator
#[derive(Debug)]
pub struct PageOutcome {
    pub page: PageNumber,
    pub result: Result<PageResult, PageError>,
}

/// The merged, globally ordered outcome of a search run
#[derive(Debug)]
pub struct RunResult {
    /// All records, most recent first
    pub records: Vec<Record>,

    /// Number of pages successfully merged
    pub page_count: u32,

    /// Number of pages the run set out to fetch, after clamping
    pub pages_expected: u32,

    /// Pages that failed during fan-out, ordered by page number
    pub failures: Vec<PageFailure>,

    /// Entries dropped across all pages because of unparsable dates
    pub dropped_records: usize,
}

impl RunResult {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if every expected page was merged
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
