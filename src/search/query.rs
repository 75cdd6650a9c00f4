//! Per-page query URL construction

use crate::search::types::{PageNumber, SearchTerm};
use url::Url;

/// Builds the query URL for one result page
///
/// The URL is a pure function of the base endpoint, the term, and the page
/// number: `<base>?utf8=✓&q=<term>&page=<n>`. Any query string already on
/// `base` is replaced.
///
/// # Example
///
/// ```
/// use deck_search::search::{page_url, SearchTerm};
/// use url::Url;
///
/// let base = Url::parse("https://speakerdeck.com/search").unwrap();
/// let term = SearchTerm::new("rust async").unwrap();
/// let url = page_url(&base, &term, 2);
/// assert_eq!(
///     url.as_str(),
///     "https://speakerdeck.com/search?utf8=%E2%9C%93&q=rust+async&page=2"
/// );
/// ```
pub fn page_url(base: &Url, term: &SearchTerm, page: PageNumber) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair("utf8", "✓")
        .append_pair("q", term.as_str())
        .append_pair("page", &page.to_string());
    url
}
