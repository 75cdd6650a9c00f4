//! Pagination coordinator - two-phase search orchestration
//!
//! A run proceeds in two phases:
//! - Discovery: page 1 is fetched and extracted inline to learn the page count
//! - Fan-out: one task per remaining page, each reporting to a single
//!   completion channel that the coordinator drains
//!
//! The coordinator spawns exactly `page_count - 1` tasks and waits for exactly
//! that many outcomes. A task that fails still reports, and a task that
//! vanishes (panics) is detected when the channel closes, so the wait always
//! terminates.

use crate::config::Config;
use crate::search::aggregator::{aborted, ResultAggregator};
use crate::search::extractor::{PageExtractor, SpeakerDeckExtractor};
use crate::search::fetcher::{build_http_client, HttpFetcher, PageFetcher};
use crate::search::types::{PageNumber, PageOutcome, PageResult, RunResult, SearchTerm};
use crate::state::CoordinatorState;
use crate::{ConfigError, PageError, SearchError};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};

/// Drives page-count discovery, fan-out, and the final merge
pub struct PaginationCoordinator<F, E> {
    fetcher: Arc<F>,
    extractor: Arc<E>,
    max_pages: u32,
    fetch_permits: Arc<Semaphore>,
    state: CoordinatorState,
}

impl<F, E> PaginationCoordinator<F, E>
where
    F: PageFetcher + 'static,
    E: PageExtractor + 'static,
{
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Retrieves raw pages
    /// * `extractor` - Turns raw pages into records
    /// * `max_pages` - The pagination limit; discovered counts are clamped to it
    /// * `max_concurrent_fetches` - How many fan-out fetches may be in flight at once
    pub fn new(fetcher: F, extractor: E, max_pages: u32, max_concurrent_fetches: u32) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            max_pages: max_pages.max(1),
            fetch_permits: Arc::new(Semaphore::new(max_concurrent_fetches.max(1) as usize)),
            state: CoordinatorState::Idle,
        }
    }

    /// Current phase of the most recent run
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn transition(&mut self, next: CoordinatorState) -> Result<(), SearchError> {
        if !self.state.can_transition_to(next) {
            return Err(SearchError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("Coordinator {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Runs a complete search for `term`
    ///
    /// # Returns
    ///
    /// * `Ok(RunResult)` - Every expected page reported; failed pages are
    ///   listed in `RunResult::failures`
    /// * `Err(SearchError::Discovery)` - Page 1 could not be fetched or read,
    ///   so no page count is known
    pub async fn run(&mut self, term: &SearchTerm) -> Result<RunResult, SearchError> {
        if self.state.is_terminal() {
            self.transition(CoordinatorState::Idle)?;
        }

        let start_time = Instant::now();
        self.transition(CoordinatorState::DiscoveringCount)?;
        tracing::info!("Searching for '{}'", term);

        let discovery = fetch_and_extract(&*self.fetcher, &*self.extractor, term, 1).await;
        let first_page = match discovery {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Page count discovery failed: {}", e);
                self.transition(CoordinatorState::Failed)?;
                return Err(SearchError::Discovery { page: 1, source: e });
            }
        };

        let page_count = clamp_page_count(first_page.total_pages_hint, self.max_pages);
        tracing::info!(
            "Discovered {} page(s), fetching {}",
            first_page
                .total_pages_hint
                .map_or_else(|| "unknown".to_string(), |n| n.to_string()),
            page_count
        );

        self.transition(CoordinatorState::FanningOut)?;
        let (mut pending, mut completions) = self.fan_out(term, page_count);
        tracing::debug!("Spawned {} page task(s)", pending.len());

        self.transition(CoordinatorState::AwaitingCompletion)?;
        let mut aggregator = ResultAggregator::new();
        aggregator.push(first_page);

        while !pending.is_empty() {
            match completions.recv().await {
                Some(outcome) => {
                    if pending.remove(&outcome.page) {
                        aggregator.accept(outcome);
                    }
                }
                None => break,
            }
        }

        // Channel closed early: those tasks died without sending.
        for page in pending {
            tracing::warn!("Page {} task ended without reporting", page);
            aggregator.record_failure(aborted(page));
        }

        self.transition(CoordinatorState::Done)?;
        let result = aggregator.finish(page_count);

        tracing::info!(
            "Search completed: {} records from {}/{} pages in {:?}",
            result.record_count(),
            result.page_count,
            page_count,
            start_time.elapsed()
        );

        Ok(result)
    }

    /// Spawns one fetch+extract task for each page in `2..=page_count`
    ///
    /// Returns the set of pages whose outcome is still owed, together with
    /// the receiving end of the completion channel. Every task holds a sender
    /// clone; the coordinator keeps none, so the channel closes once all
    /// tasks have finished.
    fn fan_out(
        &self,
        term: &SearchTerm,
        page_count: u32,
    ) -> (BTreeSet<PageNumber>, mpsc::UnboundedReceiver<PageOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut pending = BTreeSet::new();

        for page in 2..=page_count {
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let permits = Arc::clone(&self.fetch_permits);
            let term = term.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let fetched = {
                    let _permit = permits.acquire_owned().await.ok();
                    fetcher.fetch(&term, page).await
                };

                let result = fetched.map_err(PageError::from).and_then(|document| {
                    extractor
                        .extract(&document, page)
                        .map_err(PageError::from)
                });

                // The receiver only goes away if the coordinator was dropped.
                let _ = tx.send(PageOutcome { page, result });
            });

            pending.insert(page);
        }

        (pending, rx)
    }
}

/// Fetches and extracts a single page inline
async fn fetch_and_extract<F, E>(
    fetcher: &F,
    extractor: &E,
    term: &SearchTerm,
    page: PageNumber,
) -> Result<PageResult, PageError>
where
    F: PageFetcher + ?Sized,
    E: PageExtractor + ?Sized,
{
    let document = fetcher.fetch(term, page).await?;
    Ok(extractor.extract(&document, page)?)
}

/// Turns page 1's hint into the number of pages to fetch
///
/// A missing hint means only page 1 is addressable. Counts are clamped down
/// to `max_pages`, never raised, and never below 1.
pub fn clamp_page_count(hint: Option<u32>, max_pages: u32) -> u32 {
    match hint {
        Some(count) => {
            let clamped = count.clamp(1, max_pages.max(1));
            if clamped < count {
                tracing::info!(
                    "Page count {} exceeds limit, clamping to {}",
                    count,
                    clamped
                );
            }
            clamped
        }
        None => {
            tracing::info!("No page count found on page 1, treating as single page");
            1
        }
    }
}

/// Runs a search with the HTTP fetcher and Speaker Deck extractor
///
/// This is the main entry point used by the binary.
///
/// # Example
///
/// ```no_run
/// use deck_search::config::Config;
/// use deck_search::search::{run_search, SearchTerm};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let term = SearchTerm::new("golang concurrency")?;
/// let result = run_search(&Config::default(), &term).await?;
/// println!("{} records", result.record_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_search(config: &Config, term: &SearchTerm) -> Result<RunResult, SearchError> {
    let client = build_http_client(&config.user_agent, &config.http)?;
    let fetcher = HttpFetcher::new(client, &config.search.base_url)
        .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
    let extractor = SpeakerDeckExtractor::from_config(&config.selectors)?;

    let mut coordinator = PaginationCoordinator::new(
        fetcher,
        extractor,
        config.search.max_pages,
        config.search.max_concurrent_fetches,
    );
    coordinator.run(term).await
}
