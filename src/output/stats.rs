//! Run statistics
//!
//! This module provides a summary of a finished search run for the
//! diagnostic stream.

use crate::search::RunResult;
use std::io::Write;
use std::time::Duration;

/// Search run statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    /// Pages the run set out to fetch after clamping
    pub pages_expected: u32,

    /// Pages successfully merged
    pub pages_merged: u32,

    /// Failed pages with their error messages, by page number
    pub failed_pages: Vec<(u32, String)>,

    /// Total records in the result set
    pub total_records: usize,

    /// Entries dropped because of unparsable dates
    pub dropped_records: usize,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl RunStatistics {
    /// Builds statistics from a finished run
    pub fn from_result(result: &RunResult, elapsed: Duration) -> Self {
        Self {
            pages_expected: result.pages_expected,
            pages_merged: result.page_count,
            failed_pages: result
                .failures
                .iter()
                .map(|f| (f.page, f.error.to_string()))
                .collect(),
            total_records: result.record_count(),
            dropped_records: result.dropped_records,
            elapsed,
        }
    }

    /// Percentage of expected pages that were merged
    pub fn success_rate(&self) -> f64 {
        if self.pages_expected > 0 {
            (self.pages_merged as f64 / self.pages_expected as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Writes statistics in a formatted manner
pub fn write_statistics<W: Write>(stats: &RunStatistics, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "=== Search Statistics ===")?;
    writeln!(out, "  Pages expected: {}", stats.pages_expected)?;
    writeln!(out, "  Pages merged: {}", stats.pages_merged)?;
    writeln!(out, "  Records: {}", stats.total_records)?;
    if stats.dropped_records > 0 {
        writeln!(out, "  Dropped records: {}", stats.dropped_records)?;
    }
    writeln!(out, "  Elapsed: {:.2?}", stats.elapsed)?;

    if !stats.failed_pages.is_empty() {
        writeln!(out, "Failed Pages ({}):", stats.failed_pages.len())?;
        for (page, message) in &stats.failed_pages {
            writeln!(out, "  - page {}: {}", page, message)?;
        }
    }

    writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages)",
        stats.success_rate(),
        stats.pages_merged,
        stats.pages_expected
    )
}

/// Prints statistics to stderr
pub fn print_statistics(stats: &RunStatistics) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    if let Err(e) = write_statistics(stats, &mut handle) {
        tracing::warn!("Failed to print statistics: {}", e);
    }
}
