//! Integration tests for the search pipeline
//!
//! These tests use wiremock to serve Speaker Deck-shaped result pages and
//! run the real HTTP fetcher and extractor through the coordinator.

use chrono::NaiveDate;
use deck_search::config::Config;
use deck_search::search::{run_search, SearchTerm};
use deck_search::{FetchError, PageError, SearchError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TERM: &str = "golang concurrency";

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer, max_pages: u32) -> Config {
    let mut config = Config::default();
    config.search.base_url = format!("{}/search", server.uri());
    config.search.max_pages = max_pages;
    config.search.max_concurrent_fetches = 4;
    config.http.timeout_secs = 5;
    config
}

fn talk(id: &str, date: &str) -> String {
    format!(
        r#"<div class="talk public" data-id="{id}">
            <div class="talk-listing-info"><h3 class="title"><a href="/u/{id}">Talk {id}</a></h3></div>
            <div class="talk-listing-meta"><p class="date">{date}</p></div>
        </div>"#
    )
}

/// Builds a result page; `last_page` adds the pagination control
fn results_page(last_page: Option<u64>, talks: &[String]) -> String {
    let pagination = last_page
        .map(|n| {
            format!(
                r#"<nav class="pagination">
                    <span class="page current">1</span>
                    <span class="next"><a href="/search?page=2&amp;q=golang+concurrency">Next</a></span>
                    <span class="last"><a href="/search?page={n}&amp;q=golang+concurrency">Last &raquo;</a></span>
                </nav>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Search</title></head><body>
        <div id="content"><div class="container"><div class="main">
            <div class="talks">{}</div>
            {}
        </div></div></div>
        </body></html>"#,
        talks.join("\n"),
        pagination
    )
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", TERM))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, page: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn term() -> SearchTerm {
    SearchTerm::new(TERM).expect("valid term")
}

#[tokio::test]
async fn test_three_page_search_end_to_end() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        results_page(
            Some(3),
            &[talk("p1a", "Jan 2, 2020"), talk("p1b", "Mar 4, 2021")],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        2,
        results_page(
            None,
            &[talk("p2a", "Jul 14, 2019"), talk("p2b", "Nov 30, 2022")],
        ),
    )
    .await;
    mount_page(
        &mock_server,
        3,
        results_page(
            None,
            &[talk("p3a", "Feb 1, 2018"), talk("p3b", "Aug 9, 2020")],
        ),
    )
    .await;

    let config = create_test_config(&mock_server, 50);
    let result = run_search(&config, &term()).await.expect("Search failed");

    assert_eq!(result.record_count(), 6);
    assert_eq!(result.page_count, 3);
    assert!(result.is_complete());

    let newest = &result.records[0];
    assert_eq!(newest.id(), Some("p2b"));
    assert_eq!(newest.timestamp(), NaiveDate::from_ymd_opt(2022, 11, 30).unwrap());
    assert!(newest.rendered_content().contains("Talk p2b"));

    let ids: Vec<_> = result.records.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["p2b", "p1b", "p3b", "p1a", "p2a", "p3a"]);
}

#[tokio::test]
async fn test_failed_page_is_reported_not_fatal() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        results_page(Some(5), &[talk("p1", "Jan 1, 2021")]),
    )
    .await;
    for page in [2, 4, 5] {
        mount_page(
            &mock_server,
            page,
            results_page(None, &[talk(&format!("p{}", page), "Jan 1, 2020")]),
        )
        .await;
    }
    mount_status(&mock_server, 3, 500).await;

    let config = create_test_config(&mock_server, 50);
    let result = run_search(&config, &term()).await.expect("Search failed");

    assert_eq!(result.page_count, 4);
    assert_eq!(result.pages_expected, 5);
    assert_eq!(result.record_count(), 4);

    let mut ids: Vec<_> = result.records.iter().filter_map(|r| r.id()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["p1", "p2", "p4", "p5"]);

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].page, 3);
    assert!(matches!(
        result.failures[0].error,
        PageError::Fetch(FetchError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_page_count_is_clamped_to_limit() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        results_page(Some(137), &[talk("p1", "Jan 1, 2021")]),
    )
    .await;
    for page in 2..=5 {
        mount_page(
            &mock_server,
            page,
            results_page(None, &[talk(&format!("p{}", page), "Jan 1, 2020")]),
        )
        .await;
    }

    let config = create_test_config(&mock_server, 5);
    let result = run_search(&config, &term()).await.expect("Search failed");

    assert_eq!(result.page_count, 5);
    assert_eq!(result.pages_expected, 5);
    assert!(result.is_complete());

    let requests = mock_server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_oversized_page_count_is_clamped_to_limit() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        results_page(Some(u64::from(u32::MAX) + 1), &[talk("p1", "Jan 1, 2021")]),
    )
    .await;
    for page in 2..=3 {
        mount_page(
            &mock_server,
            page,
            results_page(None, &[talk(&format!("p{}", page), "Jan 1, 2020")]),
        )
        .await;
    }

    let config = create_test_config(&mock_server, 3);
    let result = run_search(&config, &term()).await.expect("Search failed");

    assert_eq!(result.page_count, 3);
    assert_eq!(result.pages_expected, 3);
    assert_eq!(result.record_count(), 3);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_missing_pagination_is_single_page() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        results_page(None, &[talk("a", "Jan 2, 2020"), talk("b", "Mar 4, 2021")]),
    )
    .await;

    let config = create_test_config(&mock_server, 50);
    let result = run_search(&config, &term()).await.expect("Search failed");

    assert_eq!(result.page_count, 1);
    assert_eq!(result.record_count(), 2);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_page_one_error_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 1, 404).await;

    let config = create_test_config(&mock_server, 50);
    let result = run_search(&config, &term()).await;

    assert!(matches!(
        result,
        Err(SearchError::Discovery {
            page: 1,
            source: PageError::Fetch(FetchError::Status { status: 404, .. })
        })
    ));
}

#[tokio::test]
async fn test_page_one_layout_mismatch_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        1,
        "<html><body><p>Down for maintenance</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&mock_server, 50);
    let result = run_search(&config, &term()).await;

    assert!(matches!(
        result,
        Err(SearchError::Discovery {
            source: PageError::Extract(_),
            ..
        })
    ));
}

#[tokio::test]
async fn test_malformed_date_drops_only_that_record() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        results_page(Some(2), &[talk("good1", "Jan 2, 2020"), talk("bad", "yesterday")]),
    )
    .await;
    mount_page(
        &mock_server,
        2,
        results_page(None, &[talk("good2", "Mar 4, 2021")]),
    )
    .await;

    let config = create_test_config(&mock_server, 50);
    let result = run_search(&config, &term()).await.expect("Search failed");

    assert_eq!(result.page_count, 2);
    assert_eq!(result.record_count(), 2);
    assert_eq!(result.dropped_records, 1);
    assert_eq!(result.records[0].id(), Some("good2"));
}
