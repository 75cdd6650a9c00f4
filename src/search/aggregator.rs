//! Result aggregation
//!
//! The aggregator is the single owner of the merge buffer. Page tasks never
//! touch it; their outcomes arrive through the coordinator's completion
//! channel and are applied here one at a time.

use crate::search::types::{PageFailure, PageOutcome, PageResult, Record, RunResult};
use crate::PageError;

/// Accumulates page outcomes and produces the final ordered result set
#[derive(Debug, Default)]
pub struct ResultAggregator {
    records: Vec<Record>,
    pages_merged: u32,
    dropped_records: usize,
    failures: Vec<PageFailure>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one page's records in arrival order
    pub fn push(&mut self, result: PageResult) {
        self.pages_merged += 1;
        self.dropped_records += result.dropped_records;
        self.records.extend(result.records);
    }

    /// Records a page that contributed nothing
    pub fn record_failure(&mut self, failure: PageFailure) {
        self.failures.push(failure);
    }

    /// Applies a completed page task's outcome
    pub fn accept(&mut self, outcome: PageOutcome) {
        match outcome.result {
            Ok(result) => self.push(result),
            Err(error) => {
                tracing::warn!("Page {} failed: {}", outcome.page, error);
                self.record_failure(PageFailure {
                    page: outcome.page,
                    error,
                });
            }
        }
    }

    /// Sorts everything most-recent-first and freezes the counts
    ///
    /// The sort is stable, so records sharing a date keep their arrival order.
    pub fn finish(mut self, pages_expected: u32) -> RunResult {
        sort_most_recent_first(&mut self.records);
        self.failures.sort_by_key(|f| f.page);

        RunResult {
            records: self.records,
            page_count: self.pages_merged,
            pages_expected,
            failures: self.failures,
            dropped_records: self.dropped_records,
        }
    }
}

/// Merges page results, in the order given, into a single run result
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use deck_search::search::{merge, PageResult, Record};
///
/// let page = |page, day, tag| PageResult {
///     page,
///     records: vec![Record::new(NaiveDate::from_ymd_opt(2021, 1, day).unwrap(), tag, None)],
///     total_pages_hint: None,
///     dropped_records: 0,
/// };
/// let pages = vec![page(1, 1, "a"), page(2, 9, "b")];
/// let run = merge(pages);
/// assert_eq!(run.page_count, 2);
/// assert_eq!(run.records[0].rendered_content(), "b");
/// ```
pub fn merge(page_results: impl IntoIterator<Item = PageResult>) -> RunResult {
    let mut aggregator = ResultAggregator::new();
    for result in page_results {
        aggregator.push(result);
    }
    let pages_expected = aggregator.pages_merged;
    aggregator.finish(pages_expected)
}

/// Stable descending sort on timestamp
pub fn sort_most_recent_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
}

/// Builds the failure entry for a page task that vanished without reporting
pub(crate) fn aborted(page: u32) -> PageFailure {
    PageFailure {
        page,
        error: PageError::TaskAborted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, d: u32, tag: &str) -> Record {
        Record::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), tag, None)
    }

    fn page(page: u32, records: Vec<Record>) -> PageResult {
        PageResult {
            page,
            records,
            total_pages_hint: None,
            dropped_records: 0,
        }
    }

    fn tags(run: &RunResult) -> Vec<&str> {
        run.records.iter().map(|r| r.rendered_content()).collect()
    }

    #[test]
    fn test_merge_sorts_descending() {
        let run = merge(vec![
            page(1, vec![record(2020, 1, 2, "a"), record(2021, 3, 4, "b")]),
            page(2, vec![record(2019, 6, 1, "c"), record(2022, 1, 1, "d")]),
        ]);

        assert_eq!(tags(&run), vec!["d", "b", "a", "c"]);
        for pair in run.records.windows(2) {
            assert!(pair[0].timestamp() >= pair[1].timestamp());
        }
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let run = merge(vec![
            page(3, vec![record(2020, 5, 5, "first"), record(2020, 5, 5, "second")]),
            page(1, vec![record(2020, 5, 5, "third"), record(2021, 1, 1, "newest")]),
        ]);

        assert_eq!(tags(&run), vec!["newest", "first", "second", "third"]);
    }

    #[test]
    fn test_counts() {
        let mut dropped = page(2, vec![record(2020, 1, 1, "x")]);
        dropped.dropped_records = 2;

        let run = merge(vec![page(1, vec![record(2020, 1, 1, "a")]), dropped, page(3, vec![])]);

        assert_eq!(run.page_count, 3);
        assert_eq!(run.pages_expected, 3);
        assert_eq!(run.record_count(), 2);
        assert_eq!(run.dropped_records, 2);
        assert!(run.is_complete());
    }

    #[test]
    fn test_merge_empty() {
        let run = merge(Vec::new());
        assert_eq!(run.page_count, 0);
        assert_eq!(run.record_count(), 0);
    }

    #[test]
    fn test_accept_tracks_failures() {
        let mut aggregator = ResultAggregator::new();
        aggregator.accept(PageOutcome {
            page: 4,
            result: Err(PageError::Fetch(FetchError::Status {
                url: "https://speakerdeck.com/search?page=4".to_string(),
                status: 500,
            })),
        });
        aggregator.accept(PageOutcome {
            page: 2,
            result: Ok(page(2, vec![record(2020, 1, 1, "a")])),
        });
        aggregator.record_failure(aborted(3));


        let run = aggregator.finish(4);
        assert_eq!(run.page_count, 1);
        assert_eq!(run.pages_expected, 4);
        assert!(!run.is_complete());
        let failed: Vec<u32> = run.failures.iter().map(|f| f.page).collect();
        assert_eq!(failed, vec![3, 4]);
        assert!(matches!(run.failures[0].error, PageError::TaskAborted));
    }
}
