use serde::Deserialize;

/// Main configuration structure for Deck-Search
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub http: HttpConfig,
    pub selectors: SelectorConfig,
}

/// Search and fan-out behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint the per-page query URLs are built from
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Upper bound on the number of pages a single run will fetch
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Maximum number of page fetches in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Number of records written to stdout
    pub top: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://speakerdeck.com/search".to_string(),
            max_pages: 50,
            max_concurrent_fetches: 16,
            top: 5,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the client
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "deck-search".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/deck-search/deck-search".to_string(),
        }
    }
}

/// Transport timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// CSS selectors and date layout used to read a result page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// The "last page" link of the pagination control
    #[serde(rename = "page-count")]
    pub page_count: String,

    /// Container that must exist on every result page
    #[serde(rename = "result-list")]
    pub result_list: String,

    /// One node per listed talk
    pub record: String,

    /// Date node, relative to a record node
    pub date: String,

    /// chrono format string for the date text
    #[serde(rename = "date-format")]
    pub date_format: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            page_count: "nav.pagination span.last a".to_string(),
            result_list: "div.talks".to_string(),
            record: "div.talks div.talk.public".to_string(),
            date: "div.talk-listing-meta p.date".to_string(),
            date_format: "%b %d, %Y".to_string(),
        }
    }
}
