//! Result page extractor
//!
//! This module turns a fetched result page into a [`PageResult`]:
//! - On page 1, the total page count from the "last page" pagination link
//! - Each listed talk, with its date parsed and its markup kept verbatim
//!
//! Entries with an unparsable date are dropped and logged. Pages missing the
//! result container, or entries missing their date node, are layout mismatches
//! and fail the whole page.

use crate::config::{parse_selector, SelectorConfig};
use crate::search::types::{PageNumber, PageResult, RawDocument, Record};
use crate::{ConfigError, DateParseError, ExtractError};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Turns a raw result page into records
pub trait PageExtractor: Send + Sync {
    /// Extracts the records on `page`, and the page count hint when `page == 1`
    fn extract(&self, document: &RawDocument, page: PageNumber) -> Result<PageResult, ExtractError>;
}

/// Extractor for Speaker Deck search result markup
#[derive(Debug, Clone)]
pub struct SpeakerDeckExtractor {
    page_count: Selector,
    result_list: Selector,
    record: Selector,
    date: Selector,
    date_format: String,
}

impl SpeakerDeckExtractor {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(SpeakerDeckExtractor)` - All selectors parsed
    /// * `Err(ConfigError::InvalidSelector)` - A selector is not valid CSS
    ///
    /// # Example
    ///
    /// ```
    /// use deck_search::config::SelectorConfig;
    /// use deck_search::search::{PageExtractor, RawDocument, SpeakerDeckExtractor};
    ///
    /// let extractor = SpeakerDeckExtractor::from_config(&SelectorConfig::default()).unwrap();
    /// let html = r#"<div class="talks">
    ///   <div class="talk public" data-id="t1">
    ///     <div class="talk-listing-meta"><p class="date">Mar 4, 2021</p></div>
    ///   </div>
    /// </div>"#;
    /// let document = RawDocument::new("https://speakerdeck.com/search", html);
    /// let result = extractor.extract(&document, 2).unwrap();
    /// assert_eq!(result.records.len(), 1);
    /// assert_eq!(result.records[0].id(), Some("t1"));
    /// ```
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            page_count: parse_selector("page_count", &config.page_count)?,
            result_list: parse_selector("result_list", &config.result_list)?,
            record: parse_selector("record", &config.record)?,
            date: parse_selector("date", &config.date)?,
            date_format: config.date_format.clone(),
        })
    }

    /// Reads the total page count from the pagination control
    fn read_page_count(&self, document: &Html, page_url: &str) -> Option<u32> {
        let link = document.select(&self.page_count).next()?;

        link.value()
            .attr("href")
            .and_then(|href| page_param(href, page_url))
            .or_else(|| parse_page_count(&link.text().collect::<String>()))
    }

    /// Builds a record from one entry node, or reports why its date is unusable
    fn read_record(
        &self,
        element: ElementRef<'_>,
        page: PageNumber,
        index: usize,
    ) -> Result<Result<Record, DateParseError>, ExtractError> {
        let date_node = element
            .select(&self.date)
            .next()
            .ok_or(ExtractError::MissingDate { page, index })?;

        let date_text = date_node.text().collect::<String>();

        Ok(parse_date(&date_text, &self.date_format).map(|timestamp| {
            Record::new(
                timestamp,
                element.html(),
                element.value().attr("data-id").map(str::to_string),
            )
        }))
    }
}

impl PageExtractor for SpeakerDeckExtractor {
    fn extract(
        &self,
        document: &RawDocument,
        page: PageNumber,
    ) -> Result<PageResult, ExtractError> {
        let html = Html::parse_document(&document.body);

        if html.select(&self.result_list).next().is_none() {
            return Err(ExtractError::MissingResults { page });
        }

        let total_pages_hint = if page == 1 {
            self.read_page_count(&html, &document.url)
        } else {
            None
        };

        let mut records = Vec::new();
        let mut dropped_records = 0;

        for (index, element) in html.select(&self.record).enumerate() {
            match self.read_record(element, page, index)? {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Dropping entry {} on page {}: {}", index, page, e);
                    dropped_records += 1;
                }
            }
        }

        tracing::debug!(
            "Extracted {} records from page {} ({} dropped)",
            records.len(),
            page,
            dropped_records
        );

        Ok(PageResult {
            page,
            records,
            total_pages_hint,
            dropped_records,
        })
    }
}

/// Parses displayed date text such as `Jan 2, 2020`
///
/// Runs of whitespace, including line breaks inside the node, are collapsed
/// before parsing.
pub fn parse_date(text: &str, format: &str) -> Result<NaiveDate, DateParseError> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    NaiveDate::parse_from_str(&normalized, format).map_err(|source| DateParseError {
        text: normalized,
        source,
    })
}

/// Parses a page count, saturating values too large for `u32`
fn parse_page_count(text: &str) -> Option<u32> {
    text.trim()
        .parse::<u64>()
        .ok()
        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
}

/// Reads the `page` query parameter of a possibly relative link
fn page_param(href: &str, page_url: &str) -> Option<u32> {
    let base = Url::parse(page_url)
        .or_else(|_| Url::parse("http://localhost/"))
        .ok()?;
    let link = base.join(href.trim()).ok()?;

    link.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| parse_page_count(&value))
}
