//! Configuration module for Deck-Search
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every section has built-in defaults, so a search can
//! run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use deck_search::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("deck-search.toml")).unwrap();
//! println!("Will fetch at most {} pages", config.search.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, SearchConfig, SelectorConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
pub(crate) use validation::parse_selector;
