//! Output module for presenting search results
//!
//! This module handles:
//! - Writing the top records' markup to stdout
//! - Summarizing a run (page and record counts, failures) on stderr

mod render;
mod stats;

pub use render::write_top_records;
pub use stats::{print_statistics, write_statistics, RunStatistics};
